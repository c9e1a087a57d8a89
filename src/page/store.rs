//! Page Store
//!
//! Owns the file handle and the page size; every read/write is one whole page.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{PageKvError, Result};

use super::{Page, PageNumber};

/// Raw page I/O against one open file
///
/// No caching: every `read_page` goes to the file. No fsync unless `sync()`
/// is called explicitly.
pub struct PageStore {
    /// Backing file path
    path: PathBuf,
    /// Open handle, `None` once closed
    file: Option<File>,
    /// Fixed page size for the life of the store
    page_size: usize,
}

impl PageStore {
    /// Open (or create) the backing file for read/write
    pub fn open(path: &Path, page_size: usize) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            page_size,
        })
    }

    /// Allocate a zero-filled in-memory page (never touches the file)
    pub fn allocate_empty_page(&self) -> Page {
        Page::zeroed(self.page_size)
    }

    /// Read exactly one page at `number * page_size`
    ///
    /// A short read (file ends before the page does) is an error.
    pub fn read_page(&self, number: PageNumber) -> Result<Page> {
        let mut file = self.handle()?;
        let offset = self.offset_of(number)?;

        let mut page = self.allocate_empty_page();
        page.number = number;

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| PageKvError::page_io("read", number, e))?;
        file.read_exact(&mut page.data)
            .map_err(|e| PageKvError::page_io("read", number, e))?;

        tracing::trace!(page = number, offset, "read page");
        Ok(page)
    }

    /// Write `page.data` at `page.number * page_size`
    pub fn write_page(&mut self, page: &Page) -> Result<()> {
        if page.data.len() != self.page_size {
            return Err(PageKvError::PageSizeMismatch {
                expected: self.page_size,
                actual: page.data.len(),
            });
        }

        let mut file = self.handle()?;
        let offset = self.offset_of(page.number)?;

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| PageKvError::page_io("write", page.number, e))?;
        file.write_all(&page.data)
            .map_err(|e| PageKvError::page_io("write", page.number, e))?;

        tracing::trace!(page = page.number, offset, "wrote page");
        Ok(())
    }

    /// Flush file contents to stable storage
    pub fn sync(&mut self) -> Result<()> {
        self.handle()?
            .sync_all()
            .map_err(|e| PageKvError::page_io("sync", 0, e))
    }

    /// Release the file handle. Calling this again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            drop(file);
            tracing::debug!(path = %self.path.display(), "page store closed");
        }
        Ok(())
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Current length of the backing file in bytes
    pub fn file_len(&self) -> Result<u64> {
        Ok(self.handle()?.metadata()?.len())
    }

    /// Get the page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn handle(&self) -> Result<&File> {
        self.file.as_ref().ok_or(PageKvError::StoreClosed)
    }

    fn offset_of(&self, number: PageNumber) -> Result<u64> {
        number.checked_mul(self.page_size as u64).ok_or_else(|| {
            PageKvError::page_io(
                "address",
                number,
                io::Error::new(io::ErrorKind::InvalidInput, "page offset overflows u64"),
            )
        })
    }
}
