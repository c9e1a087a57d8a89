//! Page Module
//!
//! Fixed-size block I/O against the single backing file.
//!
//! ## Responsibilities
//! - Hand out zero-filled page buffers
//! - Read/write exactly one page at `page_number * page_size`
//! - Fail fast once the file handle is released
//!
//! ## File Layout
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────────────┐
//! │ Page 0       │ Page 1       │ Page 2       │ ...         │
//! │ (meta)       │ (free-list)  │ (node)       │ (node)      │
//! └──────────────┴──────────────┴──────────────┴─────────────┘
//!   offset = page_number * page_size
//! ```

mod store;

pub use store::PageStore;

/// Identifies a fixed-size block in the backing file
pub type PageNumber = u64;

/// An in-memory page: its number plus exactly `page_size` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Page number (0 until assigned by the caller)
    pub number: PageNumber,
    /// Page contents
    pub data: Vec<u8>,
}

impl Page {
    /// Create a zero-filled page of `size` bytes with an unset page number
    pub fn zeroed(size: usize) -> Self {
        Self {
            number: 0,
            data: vec![0u8; size],
        }
    }
}
