//! Buffered backward writer protocol.
//!
//! A [`BackwardWriter`] fills its region from the high end toward the low
//! end: each write lands immediately *before* everything written so far,
//! while the bytes inside a single write keep their order. Record encoders
//! use this to lay out data back to front without knowing final sizes up
//! front.
//!
//! The fast/slow split and the failure contract match the forward
//! [`Writer`](crate::writer::Writer) protocol; backward writers add
//! truncation, which discards the most recently written bytes.

use crate::buffer::BackwardWindow;
use crate::chain::Chain;
use crate::object::Object;

/// Buffered byte sink filling its region from the high end downward.
pub trait BackwardWriter: Object {
    /// The current buffer window.
    fn window(&self) -> &BackwardWindow;

    /// Exclusive access to the current buffer window.
    fn window_mut(&mut self) -> &mut BackwardWindow;

    /// The backing region indexed by the window offsets.
    ///
    /// The borrow is transient; window offsets stay valid only until the
    /// next slow-path operation on this writer.
    fn window_bytes(&mut self) -> &mut [u8];

    /// Obtain a new non-empty window. Returns `false` (and records a
    /// failure) if no more room can be produced.
    fn push_slow(&mut self) -> bool;

    /// Write `src` when it does not fit the current window.
    fn write_slow(&mut self, src: &[u8]) -> bool;

    /// Write an owned string buffer that does not fit the current window.
    fn write_string_slow(&mut self, src: String) -> bool {
        self.write_slow(src.as_bytes())
    }

    /// Write a borrowed byte rope that does not fit the current window.
    ///
    /// Blocks are delegated back to front so the rope's content ends up
    /// contiguous and in order ahead of everything written earlier.
    fn write_chain_slow(&mut self, src: &Chain) -> bool {
        for block in src.blocks().rev() {
            if !self.write(block) {
                return false;
            }
        }
        true
    }

    /// Write an owned byte rope that does not fit the current window.
    fn write_chain_owned_slow(&mut self, src: Chain) -> bool {
        self.write_chain_slow(&src)
    }

    /// Whether [`BackwardWriter::truncate`] is supported.
    fn supports_truncate(&self) -> bool {
        false
    }

    /// Discard the most recently written bytes so that `pos()` becomes
    /// `new_size`.
    fn truncate(&mut self, new_size: u64) -> bool {
        let _ = new_size;
        if !self.healthy() {
            return false;
        }
        self.fail(crate::status::Status::unimplemented("truncate not supported"))
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

    /// Move the cursor directly. Used by composing layers to sync their
    /// progress into this writer.
    fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(
            cursor >= self.window().limit && cursor <= self.window().start,
            "BackwardWriter::set_cursor() outside the window"
        );
        self.window_mut().cursor = cursor;
    }

    /// Ensure at least one writable byte, producing a new window if
    /// needed.
    fn push(&mut self) -> bool {
        if self.available() > 0 {
            return true;
        }
        self.push_slow()
    }

    /// Write all of `src` ahead of everything written so far.
    fn write(&mut self, src: &[u8]) -> bool {
        if src.len() <= self.available() {
            let cursor = self.window().cursor;
            let new_cursor = cursor - src.len();
            self.window_bytes()[new_cursor..cursor].copy_from_slice(src);
            self.window_mut().cursor = new_cursor;
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
            let cursor = self.window().cursor;
            let new_cursor = cursor - src.size() as usize;
            let mut at = new_cursor;
            for block in src.blocks() {
                self.window_bytes()[at..at + block.len()].copy_from_slice(block);
                at += block.len();
            }
            self.window_mut().cursor = new_cursor;
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
