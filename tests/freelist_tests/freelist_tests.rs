//! Tests for FreeList
//!
//! These tests verify:
//! - Sequential allocation from the high-water mark
//! - FIFO reuse of released pages
//! - Rejection of invalid releases
//! - Serialization round-trips and capacity limits

use pagekv::freelist::{FreeList, FREELIST_HEADER_SIZE, PAGE_NUM_SIZE};
use pagekv::PageKvError;

// =============================================================================
// Allocation Tests
// =============================================================================

#[test]
fn test_new_freelist_starts_after_meta_page() {
    let mut list = FreeList::new();

    assert_eq!(list.max_page(), 0);
    assert_eq!(list.next_page().unwrap(), 1);
    assert_eq!(list.next_page().unwrap(), 2);
    assert_eq!(list.max_page(), 2);
}

#[test]
fn test_fifo_reuse() {
    let m = 10;
    let mut list = FreeList::with_max_page(m);

    list.release_page(4).unwrap();
    list.release_page(7).unwrap();

    assert_eq!(list.next_page().unwrap(), 4);
    assert_eq!(list.next_page().unwrap(), 7);
    assert_eq!(list.next_page().unwrap(), m + 1);
    assert_eq!(list.max_page(), m + 1);
}

#[test]
fn test_reuse_does_not_raise_max_page() {
    let mut list = FreeList::with_max_page(5);
    list.release_page(3).unwrap();

    assert_eq!(list.next_page().unwrap(), 3);
    assert_eq!(list.max_page(), 5);
    assert_eq!(list.released_count(), 0);
}

#[test]
fn test_reused_page_can_be_released_again() {
    let mut list = FreeList::with_max_page(5);

    list.release_page(2).unwrap();
    assert_eq!(list.next_page().unwrap(), 2);

    // Issued again, so releasing it again is legal
    list.release_page(2).unwrap();
    assert_eq!(list.released_pages(), vec![2]);
}

// =============================================================================
// Release Validation Tests
// =============================================================================

#[test]
fn test_double_release_rejected() {
    let mut list = FreeList::with_max_page(5);
    list.release_page(3).unwrap();

    let result = list.release_page(3);

    assert!(matches!(result, Err(PageKvError::InvalidRelease(_))));
    assert_eq!(list.released_pages(), vec![3]);
}

#[test]
fn test_release_meta_page_rejected() {
    let mut list = FreeList::with_max_page(5);

    assert!(matches!(
        list.release_page(0),
        Err(PageKvError::InvalidRelease(_))
    ));
}

#[test]
fn test_release_unallocated_page_rejected() {
    let mut list = FreeList::with_max_page(5);

    assert!(matches!(
        list.release_page(6),
        Err(PageKvError::InvalidRelease(_))
    ));
    assert_eq!(list.released_count(), 0);
}

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_serialize_layout() {
    let mut list = FreeList::with_max_page(0x0102);
    list.release_page(0x0101).unwrap();

    let mut buf = vec![0u8; 64];
    list.serialize(&mut buf).unwrap();

    assert_eq!(&buf[0..8], &0x0102u64.to_le_bytes());
    assert_eq!(&buf[8..10], &1u16.to_le_bytes());
    assert_eq!(&buf[10..18], &0x0101u64.to_le_bytes());
    assert!(buf[18..].iter().all(|&b| b == 0));
}

#[test]
fn test_roundtrip_preserves_order() {
    let mut list = FreeList::with_max_page(100);
    for page in [42, 7, 99, 1] {
        list.release_page(page).unwrap();
    }

    let mut buf = vec![0u8; 4096];
    list.serialize(&mut buf).unwrap();
    let mut decoded = FreeList::deserialize(&buf).unwrap();

    assert_eq!(decoded, list);
    assert_eq!(decoded.max_page(), 100);
    assert_eq!(decoded.released_pages(), vec![42, 7, 99, 1]);

    // Decoded state keeps enforcing the no-double-release rule
    assert!(decoded.release_page(99).is_err());
    assert_eq!(decoded.next_page().unwrap(), 42);
}

#[test]
fn test_roundtrip_large_max_page() {
    // Wider than 16 bits
    let list = FreeList::with_max_page(1 << 40);

    let mut buf = vec![0u8; 128];
    list.serialize(&mut buf).unwrap();

    assert_eq!(FreeList::deserialize(&buf).unwrap().max_page(), 1 << 40);
}

#[test]
fn test_serialize_overflow_rejected() {
    let mut list = FreeList::with_max_page(1000);
    for page in 1..=10 {
        list.release_page(page).unwrap();
    }

    let mut buf = vec![0u8; FREELIST_HEADER_SIZE + 9 * PAGE_NUM_SIZE];
    let result = list.serialize(&mut buf);

    assert!(matches!(result, Err(PageKvError::RecordTooLarge(_))));
    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn test_deserialize_truncated_rejected() {
    let mut buf = vec![0u8; FREELIST_HEADER_SIZE + 8];
    buf[8..10].copy_from_slice(&3u16.to_le_bytes());

    assert!(matches!(
        FreeList::deserialize(&buf),
        Err(PageKvError::Corruption(_))
    ));
}

// =============================================================================
// Stored Record Validation Tests
// =============================================================================

fn record(max_page: u64, entries: &[u64]) -> Vec<u8> {
    let mut buf = vec![0u8; 128];
    buf[0..8].copy_from_slice(&max_page.to_le_bytes());
    buf[8..10].copy_from_slice(&(entries.len() as u16).to_le_bytes());
    for (i, page) in entries.iter().enumerate() {
        let start = FREELIST_HEADER_SIZE + i * PAGE_NUM_SIZE;
        buf[start..start + PAGE_NUM_SIZE].copy_from_slice(&page.to_le_bytes());
    }
    buf
}

#[test]
fn test_deserialize_meta_page_entry_rejected() {
    let buf = record(5, &[0, 0]);

    assert!(matches!(
        FreeList::deserialize(&buf),
        Err(PageKvError::Corruption(_))
    ));
}

#[test]
fn test_deserialize_duplicate_entry_rejected() {
    let buf = record(5, &[3, 4, 3]);

    assert!(matches!(
        FreeList::deserialize(&buf),
        Err(PageKvError::Corruption(_))
    ));
}

#[test]
fn test_deserialize_entry_above_max_page_rejected() {
    let buf = record(5, &[2, 6]);

    assert!(matches!(
        FreeList::deserialize(&buf),
        Err(PageKvError::Corruption(_))
    ));
}

#[test]
fn test_deserialize_entry_at_max_page_accepted() {
    let buf = record(5, &[5, 1]);

    let list = FreeList::deserialize(&buf).unwrap();
    assert_eq!(list.released_pages(), vec![5, 1]);
}

#[test]
fn test_exhausted_page_numbers_rejected() {
    let mut list = FreeList::deserialize(&record(u64::MAX, &[])).unwrap();

    assert!(matches!(
        list.next_page(),
        Err(PageKvError::PagesExhausted(u64::MAX))
    ));
    assert_eq!(list.max_page(), u64::MAX);

    // Released pages are still handed out
    list.release_page(9).unwrap();
    assert_eq!(list.next_page().unwrap(), 9);
}
