//! Buffer windows: live views into a writer's backing region.
//!
//! A window is three offsets plus an absolute start position. The offsets
//! index into whatever slice the owning writer exposes through its
//! `window_bytes()` accessor; sharing a window between composed layers is
//! always descriptor-plus-reborrow, never a stored pointer.

/// Window of a forward writer.
///
/// Bytes are appended as `cursor` advances from `start` toward `limit`.
///
/// Invariants: `start <= cursor <= limit` and
/// `pos() == start_pos + (cursor - start)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardWindow {
    /// Offset of the first byte of the window.
    pub start: usize,
    /// Offset one past the last committed byte.
    pub cursor: usize,
    /// Offset one past the last writable byte.
    pub limit: usize,
    /// Absolute position corresponding to `start`.
    pub start_pos: u64,
}

impl ForwardWindow {
    /// Bytes still writable on the fast path.
    #[inline]
    pub fn available(&self) -> usize {
        self.limit - self.cursor
    }

    /// Bytes of the window already logically committed past `start_pos`.
    #[inline]
    pub fn written_to_buffer(&self) -> usize {
        self.cursor - self.start
    }

    /// Absolute position of the cursor.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.start_pos + self.written_to_buffer() as u64
    }

    /// Absolute position of the window limit.
    #[inline]
    pub fn limit_pos(&self) -> u64 {
        self.start_pos + (self.limit - self.start) as u64
    }
}

/// Window of a backward writer.
///
/// The region is consumed from the high end downward: `cursor` retreats
/// from `start` toward `limit`.
///
/// Invariants: `limit <= cursor <= start` and
/// `pos() == start_pos + (start - cursor)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackwardWindow {
    /// Offset one past the high end of the window.
    pub start: usize,
    /// Offset of the lowest committed byte.
    pub cursor: usize,
    /// Offset of the lowest writable byte.
    pub limit: usize,
    /// Absolute position corresponding to `start`.
    pub start_pos: u64,
}

impl BackwardWindow {
    /// Bytes still writable on the fast path.
    #[inline]
    pub fn available(&self) -> usize {
        self.cursor - self.limit
    }

    /// Bytes of the window already logically committed past `start_pos`.
    #[inline]
    pub fn written_to_buffer(&self) -> usize {
        self.start - self.cursor
    }

    /// Absolute position of the cursor.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.start_pos + self.written_to_buffer() as u64
    }

    /// Absolute position of the window limit.
    #[inline]
    pub fn limit_pos(&self) -> u64 {
        self.start_pos + (self.start - self.limit) as u64
    }
}
