//! Node Module
//!
//! B-tree nodes, their on-page encoding, and key lookup.
//!
//! ## Responsibilities
//! - Hold ordered items (and child pointers for internal nodes)
//! - Encode/decode a node to/from one page (slotted layout, see `codec`)
//! - Node-local ordered scan and root-to-leaf descent (see `search`)
//!
//! Nodes are never cached: each descent step reads and decodes its page again.

mod codec;
mod search;

pub use codec::{CHILD_PTR_SIZE, MAX_KEY_LEN, MAX_VALUE_LEN, NODE_HEADER_SIZE, OFFSET_SIZE};
pub use search::{find_key, NodeReader};

use crate::error::{PageKvError, Result};
use crate::page::PageNumber;

/// An immutable key/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    key: Vec<u8>,
    value: Vec<u8>,
}

impl Item {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Size of this item's heap cell: key len (1) + key + value len (1) + value
    pub fn cell_size(&self) -> usize {
        2 + self.key.len() + self.value.len()
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.key, self.value)
    }
}

/// A leaf (no children) or internal (items + 1 children) B-tree node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Page this node lives on, 0 until first written
    page_num: PageNumber,
    /// Items with strictly increasing keys
    items: Vec<Item>,
    /// Child page numbers, empty for a leaf
    children: Vec<PageNumber>,
}

impl Node {
    /// Create an empty leaf
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a leaf node from items in strictly increasing key order
    pub fn new_leaf(items: Vec<Item>) -> Result<Self> {
        check_key_order(&items)?;
        Ok(Self {
            page_num: 0,
            items,
            children: Vec::new(),
        })
    }

    /// Create an internal node. `children[i]` holds keys below `items[i]`;
    /// the last child holds keys above every item.
    pub fn new_internal(items: Vec<Item>, children: Vec<PageNumber>) -> Result<Self> {
        if children.len() != items.len() + 1 {
            return Err(PageKvError::InvalidNode(format!(
                "internal node with {} items needs {} children, got {}",
                items.len(),
                items.len() + 1,
                children.len()
            )));
        }
        check_key_order(&items)?;
        Ok(Self {
            page_num: 0,
            items,
            children,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn page_num(&self) -> PageNumber {
        self.page_num
    }

    pub fn set_page_num(&mut self, page_num: PageNumber) {
        self.page_num = page_num;
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn children(&self) -> &[PageNumber] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<PageNumber> {
        self.children.get(index).copied()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

fn check_key_order(items: &[Item]) -> Result<()> {
    for pair in items.windows(2) {
        if pair[0].key() >= pair[1].key() {
            return Err(PageKvError::InvalidNode(format!(
                "keys must be strictly increasing: {:?} is not below {:?}",
                String::from_utf8_lossy(pair[0].key()),
                String::from_utf8_lossy(pair[1].key())
            )));
        }
    }
    Ok(())
}
