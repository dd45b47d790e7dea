//! Forward writer accumulating into an owned [`Chain`].
//!
//! Bytes are staged in a scratch block; when the block fills (or the
//! writer is closed) the block is committed to the chain without copying.
//! Blocks grow geometrically between [`MIN_BLOCK_SIZE`](crate::MIN_BLOCK_SIZE)
//! and [`MAX_BLOCK_SIZE`](crate::MAX_BLOCK_SIZE).

use bytes::Bytes;
use tracing::trace;

use crate::buffer::ForwardWindow;
use crate::chain::Chain;
use crate::object::{Object, ObjectState, TypeTag};
use crate::writer::Writer;
use crate::{clamp_block_size, MIN_BLOCK_SIZE};

/// A buffered [`Writer`] appending to a [`Chain`].
#[derive(Debug)]
pub struct ChainWriter {
    state: ObjectState,
    dest: Chain,
    buf: Vec<u8>,
    window: ForwardWindow,
    block_size: usize,
}

impl ChainWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        ChainWriter::with_size_hint(0)
    }

    /// Create an empty writer whose first block is sized for an expected
    /// total of `size_hint` bytes.
    pub fn with_size_hint(size_hint: u64) -> Self {
        let block_size = clamp_block_size(size_hint as usize);
        ChainWriter {
            state: ObjectState::new(),
            dest: Chain::new(),
            buf: vec![0; block_size],
            window: ForwardWindow {
                start: 0,
                cursor: 0,
                limit: block_size,
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

    /// Commit the staged block to the chain.
    fn commit(&mut self) {
        let filled = self.window.cursor;
        if filled == 0 {
            return;
        }
        let mut block = std::mem::take(&mut self.buf);
        block.truncate(filled);
        self.dest.append(Bytes::from(block));
        self.window = ForwardWindow {
            start: 0,
            cursor: 0,
            limit: 0,
            start_pos: self.window.start_pos + filled as u64,
        };
    }

    /// Allocate a fresh staged block, doubling up to the maximum.
    fn grow(&mut self) {
        self.block_size = clamp_block_size(self.block_size.saturating_mul(2));
        trace!(block_size = self.block_size, pos = self.pos(), "chain writer grows block");
        self.buf = vec![0; self.block_size];
        self.window.limit = self.block_size;
    }
}

impl Default for ChainWriter {
    fn default() -> Self {
        ChainWriter::new()
    }
}

impl Object for ChainWriter {
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
        TypeTag::of("ChainWriter")
    }
}

impl Writer for ChainWriter {
    fn window(&self) -> &ForwardWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut ForwardWindow {
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
            // Small write that merely straddles the block boundary.
            if !self.push_slow() {
                return false;
            }
            return self.write(src);
        }
        self.commit();
        self.dest.append_slice(src);
        self.window.start_pos += src.len() as u64;
        true
    }

    fn write_chain_owned_slow(&mut self, src: Chain) -> bool {
        if !self.healthy() {
            return false;
        }
        self.commit();
        self.window.start_pos += src.size();
        self.dest.append_chain(src);
        true
    }
}
