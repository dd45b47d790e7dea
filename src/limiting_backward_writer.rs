//! Backward writer enforcing an absolute size limit.
//!
//! A [`LimitingBackwardWriter`] writes into another backward writer, up to
//! a configured ceiling on the absolute position. An attempt to write more
//! fails the writer outright, leaving destination contents unspecified.
//!
//! The wrapper operates directly inside the destination's buffer memory:
//! it imports the destination's window (clamped to the size limit), writes
//! through it on the fast path, and syncs its cursor back before every
//! operation that crosses into the destination. The destination must not
//! be accessed directly until this writer is closed.

use tracing::debug;

use crate::backward_writer::BackwardWriter;
use crate::buffer::BackwardWindow;
use crate::chain::Chain;
use crate::dependency::Dependency;
use crate::object::{Object, ObjectState, TypeTag};
use crate::status::Status;

/// A [`BackwardWriter`] which writes to another [`BackwardWriter`] up to a
/// size limit.
///
/// The destination is held through a [`Dependency`], so it may be owned
/// (closed when this writer closes) or borrowed (left open for its owner).
#[derive(Debug)]
pub struct LimitingBackwardWriter<'d, D: BackwardWriter> {
    state: ObjectState,
    window: BackwardWindow,
    size_limit: u64,
    dest: Dependency<'d, D>,
}

impl<'d, D: BackwardWriter> LimitingBackwardWriter<'d, D> {
    /// An infinite size limit.
    pub const NO_SIZE_LIMIT: u64 = u64::MAX;

    /// Create a writer over `dest` with the given absolute size limit.
    ///
    /// # Panics
    ///
    /// Panics if `size_limit` is below the destination's current position.
    pub fn new(dest: impl Into<Dependency<'d, D>>, size_limit: u64) -> Self {
        let dest = dest.into();
        assert!(
            size_limit >= dest.get().pos(),
            "LimitingBackwardWriter::new(): size limit smaller than destination position"
        );
        let mut writer = LimitingBackwardWriter {
            state: ObjectState::new(),
            window: BackwardWindow::default(),
            size_limit,
            dest,
        };
        writer.make_buffer();
        writer
    }

    /// The current size limit.
    #[inline]
    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }

    /// Change the size limit.
    ///
    /// # Panics
    ///
    /// Panics if `size_limit` is below the current position.
    pub fn set_size_limit(&mut self, size_limit: u64) {
        assert!(
            size_limit >= self.window.pos(),
            "LimitingBackwardWriter::set_size_limit(): size limit smaller than current position"
        );
        self.size_limit = size_limit;
        self.clamp_window();
    }

    /// The destination writer. Must not be mutated until this writer is
    /// closed.
    pub fn dest(&self) -> &D {
        self.dest.get()
    }

    /// Whether this writer owns (and will close) its destination.
    #[inline]
    pub fn is_owning(&self) -> bool {
        self.dest.is_owning()
    }

    /// Write this writer's cursor back into the destination. Mandatory
    /// before any operation crosses into the destination.
    fn sync_buffer(&mut self) {
        let cursor = self.window.cursor;
        self.dest.get_mut().set_cursor(cursor);
    }

    /// Import the destination's window and clamp it to the size limit;
    /// adopt the destination's failure if it is unhealthy.
    fn make_buffer(&mut self) {
        self.window = *self.dest.get().window();
        self.clamp_window();
        if !self.dest.get().healthy() {
            let dep_status = self.dest.get().status();
            if dep_status.is_ok() {
                self.state
                    .fail(Status::failed_precondition("destination writer is closed"));
            } else {
                self.state.fail(dep_status);
            }
        }
        if !self.state.healthy() {
            // A dead writer must not retain fast-path room.
            self.window.limit = self.window.cursor;
        }
    }

    /// Shrink the window so its limit position stays within the size
    /// limit.
    fn clamp_window(&mut self) {
        if self.window.limit_pos() > self.size_limit {
            let excess = self.window.limit_pos() - self.size_limit;
            self.window.limit += excess as usize;
        }
    }

    fn fail_overflow(&mut self) -> bool {
        debug!(size_limit = self.size_limit, "write exceeds size limit");
        self.window.limit = self.window.cursor;
        self.state.fail(Status::resource_exhausted(format!(
            "size limit exceeded: {}",
            self.size_limit
        )))
    }

    /// Sync, delegate one destination write, and re-import the buffer,
    /// rejecting writes that would pass the size limit.
    fn write_limited(&mut self, len: u64, op: impl FnOnce(&mut D) -> bool) -> bool {
        if !self.state.healthy() {
            return false;
        }
        if self.window.pos().saturating_add(len) > self.size_limit {
            return self.fail_overflow();
        }
        self.sync_buffer();
        let ok = op(self.dest.get_mut());
        self.make_buffer();
        ok && self.state.healthy()
    }
}

impl<'d, D: BackwardWriter> Object for LimitingBackwardWriter<'d, D> {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn done(&mut self) {
        if self.state.healthy() {
            self.sync_buffer();
        }
        if self.dest.is_owning() {
            if !self.dest.get_mut().close() {
                let dep_status = self.dest.get().status();
                if !dep_status.is_ok() {
                    self.state.fail(dep_status);
                }
            }
        }
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of("LimitingBackwardWriter")
    }
}

impl<'d, D: BackwardWriter> BackwardWriter for LimitingBackwardWriter<'d, D> {
    fn window(&self) -> &BackwardWindow {
        &self.window
    }

    fn window_mut(&mut self) -> &mut BackwardWindow {
        &mut self.window
    }

    fn window_bytes(&mut self) -> &mut [u8] {
        // Zero-copy: the fast path writes straight into the destination's
        // backing region through the imported window.
        self.dest.get_mut().window_bytes()
    }

    fn push_slow(&mut self) -> bool {
        if !self.state.healthy() {
            return false;
        }
        if self.window.pos() >= self.size_limit {
            return self.fail_overflow();
        }
        self.sync_buffer();
        let ok = self.dest.get_mut().push();
        self.make_buffer();
        ok && self.state.healthy()
    }

    fn write_slow(&mut self, src: &[u8]) -> bool {
        self.write_limited(src.len() as u64, |dest| dest.write(src))
    }

    fn write_string_slow(&mut self, src: String) -> bool {
        self.write_limited(src.len() as u64, move |dest| dest.write_string(src))
    }

    fn write_chain_slow(&mut self, src: &Chain) -> bool {
        self.write_limited(src.size(), |dest| dest.write_chain(src))
    }

    fn write_chain_owned_slow(&mut self, src: Chain) -> bool {
        self.write_limited(src.size(), move |dest| dest.write_chain_owned(src))
    }

    fn supports_truncate(&self) -> bool {
        self.dest.get().supports_truncate()
    }

    fn truncate(&mut self, new_size: u64) -> bool {
        if !self.state.healthy() {
            return false;
        }
        if new_size > self.size_limit {
            self.window.limit = self.window.cursor;
            return self.state.fail(Status::failed_precondition(
                "truncate would leave size above the size limit",
            ));
        }
        self.sync_buffer();
        let ok = self.dest.get_mut().truncate(new_size);
        self.make_buffer();
        ok && self.state.healthy()
    }
}

impl<D: BackwardWriter> Drop for LimitingBackwardWriter<'_, D> {
    fn drop(&mut self) {
        if !self.state.closed() {
            let _ = self.close();
        }
    }
}
