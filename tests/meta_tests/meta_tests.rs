//! Tests for the Meta record
//!
//! These tests verify:
//! - Byte layout (root, then free-list page)
//! - Round-trips
//! - Bytes past the record are ignored

use pagekv::meta::{Meta, META_SIZE};
use pagekv::PageKvError;

#[test]
fn test_serialize_layout() {
    let meta = Meta::new(0x1122, 0x3344);
    let mut buf = vec![0xFFu8; 64];

    meta.serialize(&mut buf).unwrap();

    assert_eq!(&buf[0..8], &0x1122u64.to_le_bytes());
    assert_eq!(&buf[8..16], &0x3344u64.to_le_bytes());
    // Remainder untouched
    assert!(buf[META_SIZE..].iter().all(|&b| b == 0xFF));
}

#[test]
fn test_roundtrip() {
    for (root, freelist_page) in [(0, 1), (3, 1), (u64::MAX, 42), (7, u64::MAX - 1)] {
        let meta = Meta::new(root, freelist_page);
        let mut buf = vec![0u8; 4096];
        meta.serialize(&mut buf).unwrap();

        assert_eq!(Meta::deserialize(&buf).unwrap(), meta);
    }
}

#[test]
fn test_trailing_bytes_ignored() {
    let mut buf = vec![0xABu8; 128];
    Meta::new(5, 1).serialize(&mut buf).unwrap();

    let meta = Meta::deserialize(&buf).unwrap();

    assert_eq!(meta.root, 5);
    assert_eq!(meta.freelist_page, 1);
}

#[test]
fn test_short_buffer_rejected() {
    let mut small = vec![0u8; META_SIZE - 1];

    assert!(matches!(
        Meta::new(1, 2).serialize(&mut small),
        Err(PageKvError::RecordTooLarge(_))
    ));
    assert!(matches!(
        Meta::deserialize(&small),
        Err(PageKvError::Corruption(_))
    ));
}
