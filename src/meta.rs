//! Meta Record
//!
//! The recovery anchor stored at page 0.
//!
//! ## Record Format
//! ```text
//! ┌───────────────┬────────────────────┬──────────────────┐
//! │ Root (8)      │ FreelistPage (8)   │ unused           │
//! └───────────────┴────────────────────┴──────────────────┘
//! ```

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};
use crate::page::PageNumber;

/// The meta record always lives at page 0
pub const META_PAGE_NUM: PageNumber = 0;

/// Root (8) + FreelistPage (8)
pub const META_SIZE: usize = 16;

/// Root page number of an empty tree
pub const NO_ROOT: PageNumber = 0;

/// Store-wide pointers needed to recover state on reopen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Meta {
    /// Page number of the B-tree root (`NO_ROOT` for an empty tree)
    pub root: PageNumber,
    /// Page number holding the serialized free list
    pub freelist_page: PageNumber,
}

impl Meta {
    pub fn new(root: PageNumber, freelist_page: PageNumber) -> Self {
        Self {
            root,
            freelist_page,
        }
    }

    /// Serialize into the first 16 bytes of `buf`; the rest is left untouched
    pub fn serialize(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < META_SIZE {
            return Err(PageKvError::RecordTooLarge(format!(
                "meta record needs {} bytes, buffer has {}",
                META_SIZE,
                buf.len()
            )));
        }
        let mut out = &mut buf[..];
        out.put_u64_le(self.root);
        out.put_u64_le(self.freelist_page);
        Ok(())
    }

    pub fn deserialize(buf: &[u8]) -> Result<Self> {
        if buf.len() < META_SIZE {
            return Err(PageKvError::Corruption(format!(
                "meta record needs {} bytes, buffer has {}",
                META_SIZE,
                buf.len()
            )));
        }
        let mut input = buf;
        let root = input.get_u64_le();
        let freelist_page = input.get_u64_le();
        Ok(Self {
            root,
            freelist_page,
        })
    }
}
