//! Backward writer accumulating into an owned [`Chain`].
//!
//! The scratch block fills from its high end downward; committed blocks
//! are prepended to the chain, so the most recently written bytes always
//! sit at the front of the result.

use bytes::Bytes;

use crate::backward_writer::BackwardWriter;
use crate::buffer::BackwardWindow;
use crate::chain::Chain;
use crate::object::{Object, ObjectState, TypeTag};
use crate::{clamp_block_size, MIN_BLOCK_SIZE};

/// A buffered [`BackwardWriter`] prepending to a [`Chain`].
#[derive(Debug)]
pub struct ChainBackwardWriter {
    state: ObjectState,
    dest: Chain,
    buf: Vec<u8>,
    window: BackwardWindow,
    block_size: usize,
}

impl ChainBackwardWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        ChainBackwardWriter::with_size_hint(0)
    }

    /// Create an empty writer whose first block is sized for an expected
    /// total of `size_hint` bytes.
    pub fn with_size_hint(size_hint: u64) -> Self {
        let block_size = clamp_block_size(size_hint as usize);
        ChainBackwardWriter {
            state: ObjectState::new(),
            dest: Chain::new(),
            buf: vec![0; block_size],
            window: BackwardWindow {
                start: block_size,
                cursor: block_size,
                limit: 0,
                start_pos: 0,
            },
            block_size,
        }
    }

    /// The accumulated bytes. Complete only after `close()`.
    pub fn dest(&self) -> &Chain {
        &self.dest
    }

    /// Take the accumulated bytes, leaving the writer's chain empty.
    pub fn take_dest(&mut self) -> Chain {
        std::mem::take(&mut self.dest)
    }

    /// Commit the staged block to the front of the chain.
    fn commit(&mut self) {
        let filled = self.window.written_to_buffer();
        if filled == 0 {
            return;
        }
        let block = Bytes::from(std::mem::take(&mut self.buf))
            .slice(self.window.cursor..self.window.start);
        self.dest.prepend(block);
        self.window = BackwardWindow {
            start: 0,
            cursor: 0,
            limit: 0,
            start_pos: self.window.start_pos + filled as u64,
        };
    }

    /// Allocate a fresh staged block, doubling up to the maximum.
    fn grow(&mut self) {
        self.block_size = clamp_block_size(self.block_size.saturating_mul(2));
        self.buf = vec![0; self.block_size];
        self.window.start = self.block_size;
        self.window.cursor = self.block_size;
        self.window.limit = 0;
    }
}

impl Default for ChainBackwardWriter {
    fn default() -> Self {
        ChainBackwardWriter::new()
    }
}

impl Object for ChainBackwardWriter {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn done(&mut self) {
        self.commit();
        self.window.limit = self.window.cursor;
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of("ChainBackwardWriter")
    }
}

impl BackwardWriter for ChainBackwardWriter {
    fn window(&self) -> &BackwardWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut BackwardWindow {
        &mut self.window
    }

    fn window_bytes(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    fn push_slow(&mut self) -> bool {
        if !self.healthy() {
            return false;
        }
        self.commit();
        self.grow();
        true
    }

    fn write_slow(&mut self, src: &[u8]) -> bool {
        if !self.healthy() {
            return false;
        }
        if src.len() < MIN_BLOCK_SIZE {
            if !self.push_slow() {
                return false;
            }
            return self.write(src);
        }
        self.commit();
        self.dest.prepend_slice(src);
        self.window.start_pos += src.len() as u64;
        true
    }

    fn write_chain_owned_slow(&mut self, src: Chain) -> bool {
        if !self.healthy() {
            return false;
        }
        self.commit();
        self.window.start_pos += src.size();
        self.dest.prepend_chain(src);
        true
    }

    fn supports_truncate(&self) -> bool {
        true
    }

    fn truncate(&mut self, new_size: u64) -> bool {
        if !self.healthy() {
            return false;
        }
        assert!(
            new_size <= self.pos(),
            "ChainBackwardWriter::truncate() beyond current position"
        );
        if new_size >= self.window.start_pos {
            self.window.cursor =
                self.window.start - (new_size - self.window.start_pos) as usize;
        } else {
            // Everything buffered plus a prefix of the chain goes away.
            let cut = self.window.start_pos - new_size;
            self.window.cursor = self.window.start;
            self.dest.remove_prefix(cut);
            self.window.start_pos = new_size;
        }
        true
    }
}
