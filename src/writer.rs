//! Buffered forward writer protocol.
//!
//! A [`Writer`] appends bytes through a window into its backing region:
//! the fast path copies into `[cursor, limit)` and advances the cursor;
//! when the window has no room, control falls to the slow path
//! (`push_slow` / `write_slow`), which is responsible for producing a new
//! window or failing the object.
//!
//! Slow-path contract: a write either consumes its entire input or fails;
//! on failure the destination contents are unspecified and no rollback is
//! attempted.

use crate::buffer::ForwardWindow;
use crate::chain::Chain;
use crate::object::Object;

/// Buffered byte sink filling its region from the low end upward.
pub trait Writer: Object {
    /// The current buffer window.
    fn window(&self) -> &ForwardWindow;

    /// Exclusive access to the current buffer window.
    ///
    /// For composing writers: updating the cursor here is how a wrapping
    /// layer syncs its progress into this writer.
    fn window_mut(&mut self) -> &mut ForwardWindow;

    /// The backing region indexed by the window offsets.
    ///
    /// The borrow is transient; window offsets stay valid only until the
    /// next slow-path operation on this writer.
    fn window_bytes(&mut self) -> &mut [u8];

    /// Obtain a new non-empty window, typically by flushing the current
    /// one to the destination. Returns `false` (and records a failure) if
    /// no more room can be produced.
    fn push_slow(&mut self) -> bool;

    /// Write `src` when it does not fit the current window.
    fn write_slow(&mut self, src: &[u8]) -> bool;

    /// Write an owned string buffer that does not fit the current window.
    fn write_string_slow(&mut self, src: String) -> bool {
        self.write_slow(src.as_bytes())
    }

    /// Write a borrowed byte rope that does not fit the current window.
    fn write_chain_slow(&mut self, src: &Chain) -> bool {
        for block in src.blocks() {
            if !self.write(block) {
                return false;
            }
        }
        true
    }

    /// Write an owned byte rope that does not fit the current window.
    ///
    /// Writers that can take over the blocks without copying override
    /// this.
    fn write_chain_owned_slow(&mut self, src: Chain) -> bool {
        self.write_chain_slow(&src)
    }

    /// Absolute position of the window start.
    #[inline]
    fn start_pos(&self) -> u64 {
        self.window().start_pos
    }

    /// Bytes of the current window already logically committed.
    #[inline]
    fn written_to_buffer(&self) -> usize {
        self.window().written_to_buffer()
    }

    /// Current absolute position.
    #[inline]
    fn pos(&self) -> u64 {
        self.window().pos()
    }

    /// Fast-path room remaining in the current window.
    #[inline]
    fn available(&self) -> usize {
        self.window().available()
    }

    /// Ensure at least one writable byte, producing a new window if
    /// needed.
    fn push(&mut self) -> bool {
        if self.available() > 0 {
            return true;
        }
        self.push_slow()
    }

    /// Write all of `src`.
    fn write(&mut self, src: &[u8]) -> bool {
        if src.len() <= self.available() {
            let cursor = self.window().cursor;
            self.window_bytes()[cursor..cursor + src.len()].copy_from_slice(src);
            self.window_mut().cursor = cursor + src.len();
            true
        } else {
            self.write_slow(src)
        }
    }

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) -> bool {
        self.write(&[byte])
    }

    /// Write an owned string buffer.
    fn write_string(&mut self, src: String) -> bool {
        if src.len() <= self.available() {
            self.write(src.as_bytes())
        } else {
            self.write_string_slow(src)
        }
    }

    /// Write a borrowed byte rope.
    fn write_chain(&mut self, src: &Chain) -> bool {
        if src.size() <= self.available() as u64 {
            for block in src.blocks() {
                let cursor = self.window().cursor;
                self.window_bytes()[cursor..cursor + block.len()].copy_from_slice(block);
                self.window_mut().cursor = cursor + block.len();
            }
            true
        } else {
            self.write_chain_slow(src)
        }
    }

    /// Write an owned byte rope, allowing zero-copy handoff of its blocks.
    fn write_chain_owned(&mut self, src: Chain) -> bool {
        if src.size() <= self.available() as u64 {
            self.write_chain(&src)
        } else {
            self.write_chain_owned_slow(src)
        }
    }
}
