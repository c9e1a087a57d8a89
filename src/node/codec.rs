//! Node codec
//!
//! Slotted-page encoding of a node into one page-sized buffer.
//!
//! ## Page Layout
//! ```text
//! ┌──────────┬───────────┬───────────────────────────────┬──────────────┬─────┬────────┐
//! │ Leaf (1) │ Count (2) │ [Child (8)] Offset (2) × n    │ [Child (8)]  │free │ cells  │
//! └──────────┴───────────┴───────────────────────────────┴──────────────┴─────┴────────┘
//!   header grows right ────────────────────────────────▶   ◀──────────── heap grows left
//!
//! Cell: [KeyLen (1)][Key][ValLen (1)][Value]
//! ```
//!
//! Child pointers are present only for internal nodes. The cell of item 0
//! sits flush against the end of the buffer; later items sit below it.

use bytes::{Buf, BufMut};

use crate::error::{PageKvError, Result};
use crate::page::PageNumber;

use super::{Item, Node};

/// Leaf flag (1) + item count (2)
pub const NODE_HEADER_SIZE: usize = 3;

/// Size of one serialized child page number
pub const CHILD_PTR_SIZE: usize = 8;

/// Size of one heap offset slot
pub const OFFSET_SIZE: usize = 2;

/// Keys are length-prefixed with a single byte
pub const MAX_KEY_LEN: usize = u8::MAX as usize;

/// Values are length-prefixed with a single byte
pub const MAX_VALUE_LEN: usize = u8::MAX as usize;

const LEAF_FLAG: u8 = 1;
const INTERNAL_FLAG: u8 = 0;

impl Node {
    /// Bytes of header region (flag, count, offsets, child pointers)
    pub fn header_size(&self) -> usize {
        let per_item = if self.is_leaf() {
            OFFSET_SIZE
        } else {
            OFFSET_SIZE + CHILD_PTR_SIZE
        };
        let trailing = if self.is_leaf() { 0 } else { CHILD_PTR_SIZE };
        NODE_HEADER_SIZE + self.items.len() * per_item + trailing
    }

    /// Exact number of bytes `serialize` will use
    pub fn encoded_size(&self) -> usize {
        self.header_size() + self.items.iter().map(Item::cell_size).sum::<usize>()
    }

    /// Whether this node fits in a page of `page_size` bytes
    pub fn fits_in(&self, page_size: usize) -> bool {
        self.check_capacity(page_size).is_ok()
    }

    /// Encode into `buf`
    ///
    /// Fails with `RecordTooLarge` if a key or value exceeds 255 bytes or
    /// the node does not fit; `buf` is untouched in that case.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<()> {
        self.check_capacity(buf.len())?;

        let header_len = self.header_size();
        let (header, heap) = buf.split_at_mut(header_len);
        let mut header = &mut header[..];
        let mut heap_end = heap.len();

        header.put_u8(if self.is_leaf() { LEAF_FLAG } else { INTERNAL_FLAG });
        header.put_u16_le(self.items.len() as u16);

        for (i, item) in self.items.iter().enumerate() {
            if !self.is_leaf() {
                header.put_u64_le(self.children[i]);
            }

            let cell_start = heap_end - item.cell_size();
            header.put_u16_le((header_len + cell_start) as u16);

            let mut cell = &mut heap[cell_start..heap_end];
            cell.put_u8(item.key.len() as u8);
            cell.put_slice(&item.key);
            cell.put_u8(item.value.len() as u8);
            cell.put_slice(&item.value);

            heap_end = cell_start;
        }

        if let Some(&last) = self.children.last() {
            header.put_u64_le(last);
        }

        Ok(())
    }

    /// Decode a node from `buf`. The page number is left at 0 for the
    /// caller to stamp.
    pub fn deserialize(buf: &[u8]) -> Result<Self> {
        if buf.len() < NODE_HEADER_SIZE {
            return Err(PageKvError::Corruption(format!(
                "node page of {} bytes is smaller than its header",
                buf.len()
            )));
        }

        let mut header = buf;
        let is_leaf = match header.get_u8() {
            LEAF_FLAG => true,
            INTERNAL_FLAG => false,
            other => {
                return Err(PageKvError::Corruption(format!(
                    "unknown leaf flag {}",
                    other
                )))
            }
        };
        let count = header.get_u16_le() as usize;

        let mut items = Vec::with_capacity(count);
        let mut children = Vec::new();

        for _ in 0..count {
            if !is_leaf {
                children.push(read_child(&mut header)?);
            }
            require(header, OFFSET_SIZE, "item offset")?;
            let offset = header.get_u16_le() as usize;
            items.push(read_cell(buf, offset)?);
        }

        if !is_leaf {
            children.push(read_child(&mut header)?);
        }

        Ok(Self {
            page_num: 0,
            items,
            children,
        })
    }

    fn check_capacity(&self, page_size: usize) -> Result<()> {
        for item in &self.items {
            if item.key.len() > MAX_KEY_LEN {
                return Err(PageKvError::RecordTooLarge(format!(
                    "key of {} bytes exceeds {} byte limit",
                    item.key.len(),
                    MAX_KEY_LEN
                )));
            }
            if item.value.len() > MAX_VALUE_LEN {
                return Err(PageKvError::RecordTooLarge(format!(
                    "value of {} bytes exceeds {} byte limit",
                    item.value.len(),
                    MAX_VALUE_LEN
                )));
            }
        }

        if page_size > u16::MAX as usize + 1 {
            return Err(PageKvError::RecordTooLarge(format!(
                "page of {} bytes cannot be addressed by 16-bit cell offsets",
                page_size
            )));
        }

        let needed = self.encoded_size();
        if needed > page_size {
            return Err(PageKvError::RecordTooLarge(format!(
                "node with {} items needs {} bytes, page has {}",
                self.items.len(),
                needed,
                page_size
            )));
        }
        Ok(())
    }
}

fn require(input: &[u8], len: usize, what: &str) -> Result<()> {
    if input.remaining() < len {
        return Err(PageKvError::Corruption(format!(
            "{} truncated: need {} bytes, {} left",
            what,
            len,
            input.remaining()
        )));
    }
    Ok(())
}

fn read_child(header: &mut &[u8]) -> Result<PageNumber> {
    require(header, CHILD_PTR_SIZE, "child pointer")?;
    Ok(header.get_u64_le())
}

fn read_cell(page: &[u8], offset: usize) -> Result<Item> {
    let mut cell = page.get(offset..).ok_or_else(|| {
        PageKvError::Corruption(format!(
            "cell offset {} outside {} byte page",
            offset,
            page.len()
        ))
    })?;

    require(cell, 1, "key length")?;
    let key_len = cell.get_u8() as usize;
    require(cell, key_len, "key")?;
    let key = cell[..key_len].to_vec();
    cell.advance(key_len);

    require(cell, 1, "value length")?;
    let value_len = cell.get_u8() as usize;
    require(cell, value_len, "value")?;
    let value = cell[..value_len].to_vec();

    Ok(Item { key, value })
}
