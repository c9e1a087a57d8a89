//! Shared store handle
//!
//! `Store` has no internal locking. `SharedStore` puts one store behind a
//! single exclusive lock, so every operation runs alone for its duration.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::node::Node;
use crate::store::Store;

/// Cloneable handle to one exclusively locked `Store`
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<Store>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Get the value stored for `key`
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.inner.lock().get(key)
    }

    /// Find `key` from the current root
    pub fn find_key(&self, key: &[u8]) -> Result<Option<(usize, Node)>> {
        self.inner.lock().find_key(key)
    }

    /// Run `f` with exclusive access to the store
    ///
    /// Multi-step mutations (write nodes, set root, persist) should go
    /// through one call so no other caller observes the middle.
    pub fn with<T>(&self, f: impl FnOnce(&mut Store) -> Result<T>) -> Result<T> {
        let mut store = self.inner.lock();
        f(&mut *store)
    }

    /// Close the underlying store for every handle
    pub fn close(&self) -> Result<()> {
        self.inner.lock().close()
    }
}
