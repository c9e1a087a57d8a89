//! Error types for PageKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::page::PageNumber;

/// Result type alias using PageKvError
pub type Result<T> = std::result::Result<T, PageKvError>;

/// Unified error type for PageKV operations
#[derive(Debug, Error)]
pub enum PageKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error during {op} of page {page}: {source}")]
    PageIo {
        op: &'static str,
        page: PageNumber,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store is closed")]
    StoreClosed,

    // -------------------------------------------------------------------------
    // Page / Record Errors
    // -------------------------------------------------------------------------
    #[error("Record too large: {0}")]
    RecordTooLarge(String),

    #[error("Page size mismatch: expected {expected} bytes, got {actual}")]
    PageSizeMismatch { expected: usize, actual: usize },

    #[error("Corrupt page: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Allocation Errors
    // -------------------------------------------------------------------------
    #[error("Invalid page release: {0}")]
    InvalidRelease(String),

    #[error("Page numbers exhausted (max page {0})")]
    PagesExhausted(u64),

    // -------------------------------------------------------------------------
    // Tree Errors
    // -------------------------------------------------------------------------
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    #[error("Lookup exceeded maximum depth of {0} levels")]
    DepthExceeded(usize),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PageKvError {
    /// Wrap an I/O error with the page operation that produced it
    pub(crate) fn page_io(op: &'static str, page: PageNumber, source: std::io::Error) -> Self {
        PageKvError::PageIo { op, page, source }
    }
}
