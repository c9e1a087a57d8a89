//! Configuration for PageKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{PageKvError, Result};

/// Common host memory page size, used when no page size is given
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Smallest page size accepted (meta, free-list and node headers must fit)
pub const MIN_PAGE_SIZE: usize = 128;

/// Largest page size accepted: node heap offsets are stored as u16
pub const MAX_PAGE_SIZE: usize = 65536;

/// Main configuration for a PageKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single backing file
    /// Layout:
    ///   page 0           meta record
    ///   page freelist    free-list record
    ///   other pages      B-tree nodes
    pub path: PathBuf,

    /// Fixed page size in bytes. Must match the size the file was created with.
    pub page_size: usize,

    // -------------------------------------------------------------------------
    // Lookup Configuration
    // -------------------------------------------------------------------------
    /// Maximum number of nodes visited by one lookup before giving up
    pub max_lookup_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./pagekv.db"),
            page_size: DEFAULT_PAGE_SIZE,
            max_lookup_depth: 64,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can back a store
    pub fn validate(&self) -> Result<()> {
        if self.page_size < MIN_PAGE_SIZE || self.page_size > MAX_PAGE_SIZE {
            return Err(PageKvError::Config(format!(
                "page size {} outside supported range {}..={}",
                self.page_size, MIN_PAGE_SIZE, MAX_PAGE_SIZE
            )));
        }
        if self.max_lookup_depth == 0 {
            return Err(PageKvError::Config(
                "max lookup depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the page size (in bytes)
    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    /// Set the lookup depth cap
    pub fn max_lookup_depth(mut self, depth: usize) -> Self {
        self.config.max_lookup_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
