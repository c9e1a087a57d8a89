//! Free-Page Allocator
//!
//! Tracks the high-water page number and a FIFO queue of released pages.
//!
//! ## Record Format
//! ```text
//! ┌───────────────┬────────────┬──────────────────────────────┐
//! │ MaxPage (8)   │ Count (2)  │ Released page numbers (8 × n)│
//! └───────────────┴────────────┴──────────────────────────────┘
//!   all fields little-endian
//! ```

use std::collections::{HashSet, VecDeque};

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};
use crate::meta::META_PAGE_NUM;
use crate::page::PageNumber;

/// MaxPage (8) + Count (2)
pub const FREELIST_HEADER_SIZE: usize = 10;

/// Size of one serialized page number
pub const PAGE_NUM_SIZE: usize = 8;

/// Allocation bookkeeping for the store
///
/// Every page in `1..=max_page` is either queued in `released` or issued.
/// Allocation and release are in-memory only; `Store::write_freelist`
/// persists the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeList {
    /// Highest page number ever issued (monotonically non-decreasing)
    max_page: PageNumber,
    /// Released pages, oldest first
    released: VecDeque<PageNumber>,
    /// Mirror of `released` for O(1) double-release checks
    released_set: HashSet<PageNumber>,
}

impl FreeList {
    /// Create an empty free list. Page 0 is the meta page, so the first
    /// allocation returns page 1.
    pub fn new() -> Self {
        Self::with_max_page(META_PAGE_NUM)
    }

    /// Create an empty free list whose high-water mark is `max_page`
    pub fn with_max_page(max_page: PageNumber) -> Self {
        Self {
            max_page,
            released: VecDeque::new(),
            released_set: HashSet::new(),
        }
    }

    /// Get the next page number to write to
    ///
    /// Reuses the oldest released page if any, otherwise grows the file.
    pub fn next_page(&mut self) -> Result<PageNumber> {
        if let Some(page) = self.released.pop_front() {
            self.released_set.remove(&page);
            return Ok(page);
        }
        self.max_page = self
            .max_page
            .checked_add(1)
            .ok_or(PageKvError::PagesExhausted(self.max_page))?;
        Ok(self.max_page)
    }

    /// Queue a page for reuse
    ///
    /// Rejects the meta page, pages never issued, and pages already queued.
    /// Whether the page is still reachable from the tree is the caller's concern.
    pub fn release_page(&mut self, page: PageNumber) -> Result<()> {
        if page == META_PAGE_NUM {
            return Err(PageKvError::InvalidRelease(
                "page 0 is reserved for the meta record".to_string(),
            ));
        }
        if page > self.max_page {
            return Err(PageKvError::InvalidRelease(format!(
                "page {} was never allocated (max page {})",
                page, self.max_page
            )));
        }
        if !self.released_set.insert(page) {
            return Err(PageKvError::InvalidRelease(format!(
                "page {} is already released",
                page
            )));
        }
        self.released.push_back(page);
        Ok(())
    }

    /// Highest page number ever issued
    pub fn max_page(&self) -> PageNumber {
        self.max_page
    }

    /// Released pages, oldest first
    pub fn released_pages(&self) -> Vec<PageNumber> {
        self.released.iter().copied().collect()
    }

    /// Number of pages waiting for reuse
    pub fn released_count(&self) -> usize {
        self.released.len()
    }

    /// Bytes needed to serialize the current state
    pub fn serialized_size(&self) -> usize {
        FREELIST_HEADER_SIZE + self.released.len() * PAGE_NUM_SIZE
    }

    /// Serialize into the start of `buf` (normally one page)
    pub fn serialize(&self, buf: &mut [u8]) -> Result<()> {
        let needed = self.serialized_size();
        if needed > buf.len() || self.released.len() > u16::MAX as usize {
            return Err(PageKvError::RecordTooLarge(format!(
                "free list with {} released pages needs {} bytes, page has {}",
                self.released.len(),
                needed,
                buf.len()
            )));
        }

        let mut out = &mut buf[..];
        out.put_u64_le(self.max_page);
        out.put_u16_le(self.released.len() as u16);
        for page in &self.released {
            out.put_u64_le(*page);
        }
        Ok(())
    }

    /// Deserialize from the start of `buf`
    pub fn deserialize(buf: &[u8]) -> Result<Self> {
        let mut input = buf;
        if input.remaining() < FREELIST_HEADER_SIZE {
            return Err(PageKvError::Corruption(format!(
                "free list record needs {} header bytes, buffer has {}",
                FREELIST_HEADER_SIZE,
                buf.len()
            )));
        }

        let max_page = input.get_u64_le();
        let count = input.get_u16_le() as usize;
        if input.remaining() < count * PAGE_NUM_SIZE {
            return Err(PageKvError::Corruption(format!(
                "free list claims {} released pages but only {} bytes follow",
                count,
                input.remaining()
            )));
        }

        // Stored entries obey the same rules as release_page
        let mut list = Self::with_max_page(max_page);
        for i in 0..count {
            let page = input.get_u64_le();
            if page == META_PAGE_NUM || page > max_page {
                return Err(PageKvError::Corruption(format!(
                    "free list entry {} is page {}, outside 1..={}",
                    i, page, max_page
                )));
            }
            if !list.released_set.insert(page) {
                return Err(PageKvError::Corruption(format!(
                    "free list entry {} repeats page {}",
                    i, page
                )));
            }
            list.released.push_back(page);
        }
        Ok(list)
    }
}
