//! Key lookup
//!
//! Node-local ordered scan plus a bounded root-to-leaf descent.

use std::cmp::Ordering;

use crate::error::{PageKvError, Result};
use crate::meta::META_PAGE_NUM;
use crate::page::PageNumber;

use super::Node;

/// Source of decoded nodes for a descent (the store, or a test double)
pub trait NodeReader {
    /// Read and decode the node stored at `page`, with its page number set
    fn read_node(&self, page: PageNumber) -> Result<Node>;
}

impl Node {
    /// Scan items left to right for `key`
    ///
    /// Returns:
    /// - `(true, i)`: `items[i]` has exactly this key
    /// - `(false, i)`: first item sorting after `key`; also the child to descend into
    /// - `(false, item_count)`: every item sorts before `key`
    pub fn find_key_in_node(&self, key: &[u8]) -> (bool, usize) {
        for (i, item) in self.items.iter().enumerate() {
            match item.key().cmp(key) {
                Ordering::Equal => return (true, i),
                Ordering::Greater => return (false, i),
                Ordering::Less => {}
            }
        }
        (false, self.items.len())
    }
}

/// Descend from `root` looking for `key`
///
/// Returns `Ok(Some((index, node)))` with the node holding the match, or
/// `Ok(None)` when a leaf is reached without one. At most `max_depth` nodes
/// (root included) are visited; a longer path means the tree has a cycle or
/// is deeper than configured, and fails with `DepthExceeded`.
pub fn find_key<R: NodeReader + ?Sized>(
    reader: &R,
    root: Node,
    key: &[u8],
    max_depth: usize,
) -> Result<Option<(usize, Node)>> {
    let mut node = root;
    let mut depth = 1;

    loop {
        let (found, index) = node.find_key_in_node(key);
        tracing::trace!(page = node.page_num(), depth, found, index, "lookup step");

        if found {
            return Ok(Some((index, node)));
        }
        if node.is_leaf() {
            return Ok(None);
        }
        if depth >= max_depth {
            return Err(PageKvError::DepthExceeded(max_depth));
        }

        let child = node.child(index).ok_or_else(|| {
            PageKvError::Corruption(format!(
                "node {} has no child {} for descent",
                node.page_num(),
                index
            ))
        })?;
        if child == META_PAGE_NUM {
            return Err(PageKvError::Corruption(format!(
                "node {} points at the meta page as child {}",
                node.page_num(),
                index
            )));
        }

        node = reader.read_node(child)?;
        depth += 1;
    }
}
