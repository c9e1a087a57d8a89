//! # PageKV
//!
//! An embedded, single-file key-value store organized as a paged B-tree:
//! - Fixed-size page I/O against one backing file
//! - Free-page allocator with FIFO reuse of released pages
//! - Meta record at page 0 anchoring root and free-list on reopen
//! - Slotted-page node encoding
//! - Bounded root-to-leaf key lookup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Caller / SharedStore                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Store                               │
//! │              (lookup, node read/write, persist)              │
//! └──────┬──────────────────┬───────────────────┬───────────────┘
//!        │                  │                   │
//!        ▼                  ▼                   ▼
//!   ┌──────────┐     ┌────────────┐      ┌─────────────┐
//!   │   Meta   │     │  FreeList  │      │ Node Codec  │
//!   │ (page 0) │     │ (1 page)   │      │  (slotted)  │
//!   └────┬─────┘     └─────┬──────┘      └──────┬──────┘
//!        │                 │                    │
//!        └─────────────────┼────────────────────┘
//!                          ▼
//!                   ┌─────────────┐
//!                   │  PageStore  │
//!                   │   (file)    │
//!                   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod page;
pub mod freelist;
pub mod meta;
pub mod node;
pub mod store;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PageKvError, Result};
pub use config::Config;
pub use freelist::FreeList;
pub use meta::Meta;
pub use node::{Item, Node};
pub use page::{Page, PageNumber, PageStore};
pub use shared::SharedStore;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of PageKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
