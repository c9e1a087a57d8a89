//! Store Module
//!
//! The data access layer that coordinates all components.
//!
//! ## Responsibilities
//! - Open or create the backing file and recover Meta + FreeList
//! - Delegate page I/O and allocation to the owned components
//! - Read/write B-tree nodes
//! - Key lookups from the persisted root
//!
//! ## Persistence
//! Allocation, release and `set_root` only change in-memory state. Nothing
//! is flushed implicitly: call `persist()` (or `write_freelist` +
//! `write_meta`) before `close()` for those changes to survive a reopen.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{PageKvError, Result};
use crate::freelist::FreeList;
use crate::meta::{Meta, META_PAGE_NUM, NO_ROOT};
use crate::node::{self, Node, NodeReader};
use crate::page::{Page, PageNumber, PageStore};

/// An open paged B-tree store
///
/// ## Ownership
/// The store exclusively owns its file handle, free list and meta record.
/// It performs no locking; wrap it in `SharedStore` to use it from several
/// threads.
pub struct Store {
    /// Store configuration
    config: Config,

    /// Raw page I/O
    pages: PageStore,

    /// Allocation state (live copy, persisted on request)
    freelist: FreeList,

    /// Root and free-list pointers (live copy, persisted on request)
    meta: Meta,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// Existing file:
    /// 1. Read Meta from page 0
    /// 2. Read FreeList from `meta.freelist_page`
    ///
    /// New (or empty) file:
    /// 1. Start an empty FreeList and allocate its page
    /// 2. Write FreeList, then Meta
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let exists = config.path.exists() && fs::metadata(&config.path)?.len() > 0;
        let pages = PageStore::open(&config.path, config.page_size)?;

        let mut store = Self {
            config,
            pages,
            freelist: FreeList::new(),
            meta: Meta::default(),
        };

        if exists {
            let file_len = store.pages.file_len()?;
            if file_len % store.page_size() as u64 != 0 {
                tracing::warn!(
                    file_len,
                    page_size = store.page_size(),
                    "file length is not a multiple of the page size"
                );
            }

            store.meta = store.read_meta()?;
            store.freelist = store.read_freelist()?;

            tracing::info!(
                path = %store.config.path.display(),
                root = store.meta.root,
                freelist_page = store.meta.freelist_page,
                max_page = store.freelist.max_page(),
                "reopened store"
            );
        } else {
            store.meta.freelist_page = store.freelist.next_page()?;
            store.write_freelist()?;
            store.write_meta()?;

            tracing::info!(
                path = %store.config.path.display(),
                page_size = store.page_size(),
                "created store"
            );
        }

        Ok(store)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified file path
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().path(path).build();
        Self::open(config)
    }

    /// Release the file handle
    ///
    /// Does not persist Meta or FreeList. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if !self.pages.is_closed() {
            tracing::info!(path = %self.config.path.display(), "closing store");
        }
        self.pages.close()
    }

    pub fn is_closed(&self) -> bool {
        self.pages.is_closed()
    }

    // =========================================================================
    // Page I/O (delegates to PageStore)
    // =========================================================================

    pub fn allocate_empty_page(&self) -> Page {
        self.pages.allocate_empty_page()
    }

    pub fn read_page(&self, number: PageNumber) -> Result<Page> {
        self.pages.read_page(number)
    }

    pub fn write_page(&mut self, page: &Page) -> Result<()> {
        self.pages.write_page(page)
    }

    /// Force file contents to disk
    pub fn sync(&mut self) -> Result<()> {
        self.pages.sync()
    }

    // =========================================================================
    // Allocation (delegates to FreeList)
    // =========================================================================

    /// Get the next page number for a new page (in memory only)
    pub fn next_page(&mut self) -> Result<PageNumber> {
        self.freelist.next_page()
    }

    /// Queue a page for reuse (in memory only)
    pub fn release_page(&mut self, page: PageNumber) -> Result<()> {
        if page == self.meta.freelist_page {
            return Err(PageKvError::InvalidRelease(format!(
                "page {} holds the free list",
                page
            )));
        }
        self.freelist.release_page(page)
    }

    pub fn freelist(&self) -> &FreeList {
        &self.freelist
    }

    // =========================================================================
    // Meta / FreeList persistence
    // =========================================================================

    pub fn meta(&self) -> Meta {
        self.meta
    }

    pub fn root(&self) -> PageNumber {
        self.meta.root
    }

    /// Point the tree at a new root (in memory only)
    pub fn set_root(&mut self, root: PageNumber) {
        self.meta.root = root;
    }

    /// Write the live Meta record to page 0
    pub fn write_meta(&mut self) -> Result<()> {
        let mut page = self.allocate_empty_page();
        page.number = META_PAGE_NUM;
        self.meta.serialize(&mut page.data)?;
        self.pages.write_page(&page)?;

        tracing::debug!(
            root = self.meta.root,
            freelist_page = self.meta.freelist_page,
            "wrote meta"
        );
        Ok(())
    }

    /// Read the Meta record stored at page 0
    pub fn read_meta(&self) -> Result<Meta> {
        let page = self.pages.read_page(META_PAGE_NUM)?;
        Meta::deserialize(&page.data)
    }

    /// Write the live FreeList to `meta.freelist_page`
    pub fn write_freelist(&mut self) -> Result<()> {
        let mut page = self.allocate_empty_page();
        page.number = self.meta.freelist_page;
        self.freelist.serialize(&mut page.data)?;
        self.pages.write_page(&page)?;

        tracing::debug!(
            page = page.number,
            max_page = self.freelist.max_page(),
            released = self.freelist.released_count(),
            "wrote free list"
        );
        Ok(())
    }

    /// Read the FreeList stored at `meta.freelist_page`
    pub fn read_freelist(&self) -> Result<FreeList> {
        if self.meta.freelist_page == META_PAGE_NUM {
            return Err(PageKvError::Corruption(
                "meta record points the free list at page 0".to_string(),
            ));
        }
        let page = self.pages.read_page(self.meta.freelist_page)?;
        FreeList::deserialize(&page.data)
    }

    /// Write FreeList then Meta
    pub fn persist(&mut self) -> Result<()> {
        self.write_freelist()?;
        self.write_meta()
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Read and decode the node at `page_num`
    pub fn get_node(&self, page_num: PageNumber) -> Result<Node> {
        if page_num == META_PAGE_NUM {
            return Err(PageKvError::Corruption(
                "page 0 holds the meta record, not a node".to_string(),
            ));
        }
        let page = self.pages.read_page(page_num)?;
        let mut node = Node::deserialize(&page.data)?;
        node.set_page_num(page_num);
        Ok(node)
    }

    /// Encode and write `node`, allocating a page on its first write
    ///
    /// The node is encoded before a page is allocated, so a node that does
    /// not fit (or a closed store) consumes no page number. The meta and
    /// free-list pages are never valid node targets.
    pub fn write_node(&mut self, node: &mut Node) -> Result<PageNumber> {
        if self.pages.is_closed() {
            return Err(PageKvError::StoreClosed);
        }
        if node.page_num() == self.meta.freelist_page {
            return Err(PageKvError::InvalidNode(format!(
                "page {} holds the free list",
                node.page_num()
            )));
        }
        let mut page = self.allocate_empty_page();
        node.serialize(&mut page.data)?;

        if node.page_num() == 0 {
            node.set_page_num(self.freelist.next_page()?);
        }
        page.number = node.page_num();
        self.pages.write_page(&page)?;

        tracing::debug!(
            page = page.number,
            items = node.item_count(),
            leaf = node.is_leaf(),
            "wrote node"
        );
        Ok(page.number)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Find `key` starting from the current root
    ///
    /// Returns the match index and the node holding it, or `None`. An empty
    /// tree (root 0) has no keys.
    pub fn find_key(&self, key: &[u8]) -> Result<Option<(usize, Node)>> {
        if self.pages.is_closed() {
            return Err(PageKvError::StoreClosed);
        }
        if self.meta.root == NO_ROOT {
            return Ok(None);
        }
        let root = self.get_node(self.meta.root)?;
        self.find_key_from(root, key)
    }

    /// Find `key` starting from an already loaded node
    pub fn find_key_from(&self, start: Node, key: &[u8]) -> Result<Option<(usize, Node)>> {
        node::find_key(self, start, key, self.config.max_lookup_depth)
    }

    /// Get the value stored for `key`
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.find_key(key)?.and_then(|(index, node)| {
            node.item(index).map(|item| item.value().to_vec())
        }))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn page_size(&self) -> usize {
        self.pages.page_size()
    }

    pub fn path(&self) -> &Path {
        self.pages.path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl NodeReader for Store {
    fn read_node(&self, page: PageNumber) -> Result<Node> {
        self.get_node(page)
    }
}
