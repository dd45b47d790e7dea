//! Byte rope built from refcounted blocks.
//!
//! A [`Chain`] holds a sequence of [`Bytes`] blocks plus a total size.
//! Blocks are shared by reference count, so moving a chain between writer
//! layers hands the bytes off without copying. Backward writers prepend
//! blocks; forward writers append them.

use std::collections::VecDeque;

use bytes::Bytes;

/// A sequence of byte blocks forming one logical byte string.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: VecDeque<Bytes>,
    size: u64,
}

impl Chain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Chain::default()
    }

    /// Total size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check whether the chain holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Iterate over the blocks front to back.
    #[inline]
    pub fn blocks(&self) -> std::collections::vec_deque::Iter<'_, Bytes> {
        self.blocks.iter()
    }

    /// Append a block at the back.
    pub fn append(&mut self, block: Bytes) {
        if block.is_empty() {
            return;
        }
        self.size += block.len() as u64;
        self.blocks.push_back(block);
    }

    /// Copy a slice into a new block at the back.
    pub fn append_slice(&mut self, src: &[u8]) {
        self.append(Bytes::copy_from_slice(src));
    }

    /// Prepend a block at the front.
    pub fn prepend(&mut self, block: Bytes) {
        if block.is_empty() {
            return;
        }
        self.size += block.len() as u64;
        self.blocks.push_front(block);
    }

    /// Copy a slice into a new block at the front.
    pub fn prepend_slice(&mut self, src: &[u8]) {
        self.prepend(Bytes::copy_from_slice(src));
    }

    /// Move all blocks of `other` to the back, in order.
    pub fn append_chain(&mut self, other: Chain) {
        self.size += other.size;
        self.blocks.extend(other.blocks);
    }

    /// Move all blocks of `other` to the front, preserving their order.
    pub fn prepend_chain(&mut self, other: Chain) {
        self.size += other.size;
        for block in other.blocks.into_iter().rev() {
            self.blocks.push_front(block);
        }
    }

    /// Drop `n` bytes from the front.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the chain size.
    pub fn remove_prefix(&mut self, n: u64) {
        assert!(n <= self.size, "Chain::remove_prefix() beyond chain size");
        let mut remaining = n;
        while remaining > 0 {
            let front_len = self.blocks[0].len() as u64;
            if front_len <= remaining {
                self.blocks.pop_front();
                remaining -= front_len;
            } else {
                let block = &mut self.blocks[0];
                *block = block.slice(remaining as usize..);
                remaining = 0;
            }
        }
        self.size -= n;
    }

    /// Remove all blocks.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.size = 0;
    }

    /// Flatten into a contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size as usize);
        for block in &self.blocks {
            out.extend_from_slice(block);
        }
        out
    }
}

impl From<Bytes> for Chain {
    fn from(block: Bytes) -> Self {
        let mut chain = Chain::new();
        chain.append(block);
        chain
    }
}

impl From<Vec<u8>> for Chain {
    fn from(bytes: Vec<u8>) -> Self {
        Chain::from(Bytes::from(bytes))
    }
}

impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.to_vec() == other.to_vec()
    }
}

impl Eq for Chain {}
