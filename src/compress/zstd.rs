//! Zstandard backend writer.
//!
//! Stages uncompressed bytes in a window and feeds them through a
//! `zstd` streaming encoder into an owned accumulator. The compressed
//! bytes become available after `close()`.

use std::io::Write as _;

use crate::buffer::ForwardWindow;
use crate::chain::Chain;
use crate::object::{Object, ObjectState, TypeTag};
use crate::status::Status;
use crate::writer::Writer;
use crate::DEFAULT_BUFFER_SIZE;

/// A buffered [`Writer`] compressing with Zstandard.
pub struct ZstdWriter {
    state: ObjectState,
    buf: Vec<u8>,
    window: ForwardWindow,
    encoder: Option<zstd::stream::write::Encoder<'static, Vec<u8>>>,
    out: Chain,
}

impl ZstdWriter {
    /// Create a writer at the given numeric level; `size_hint` estimates
    /// the total uncompressed size for accumulator pre-sizing.
    pub fn new(level: i32, size_hint: u64) -> Self {
        let state = ObjectState::new();
        let accumulator = Vec::with_capacity(size_hint.min(DEFAULT_BUFFER_SIZE as u64) as usize);
        let encoder = match zstd::stream::write::Encoder::new(accumulator, level) {
            Ok(encoder) => Some(encoder),
            Err(e) => {
                state.fail(Status::internal(format!("zstd encoder init: {e}")));
                None
            }
        };
        // No fast-path room if the encoder never came up.
        let limit = if encoder.is_some() { DEFAULT_BUFFER_SIZE } else { 0 };
        ZstdWriter {
            state,
            buf: vec![0; DEFAULT_BUFFER_SIZE],
            window: ForwardWindow {
                start: 0,
                cursor: 0,
                limit,
                start_pos: 0,
            },
            encoder,
            out: Chain::new(),
        }
    }

    /// Take the compressed bytes. Complete only after `close()`.
    pub fn take_output(&mut self) -> Chain {
        std::mem::take(&mut self.out)
    }

    /// Feed the staged window through the encoder.
    fn flush_staging(&mut self) -> bool {
        let filled = self.window.cursor;
        if filled == 0 {
            return true;
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return false;
        };
        if let Err(e) = encoder.write_all(&self.buf[..filled]) {
            self.window.limit = self.window.cursor;
            return self.state.fail(Status::internal(format!("zstd: {e}")));
        }
        self.window.start_pos += filled as u64;
        self.window.cursor = 0;
        true
    }
}

impl Object for ZstdWriter {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn done(&mut self) {
        let flushed = self.flush_staging();
        self.window.limit = self.window.cursor;
        if let Some(encoder) = self.encoder.take() {
            match encoder.finish() {
                Ok(bytes) => {
                    if flushed {
                        self.out = Chain::from(bytes);
                    }
                }
                Err(e) => {
                    self.state.fail(Status::internal(format!("zstd finish: {e}")));
                }
            }
        }
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of("ZstdWriter")
    }
}

impl Writer for ZstdWriter {
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
        if !self.state.healthy() {
            return false;
        }
        self.flush_staging()
    }

    fn write_slow(&mut self, src: &[u8]) -> bool {
        if !self.state.healthy() {
            return false;
        }
        if !self.flush_staging() {
            return false;
        }
        let Some(encoder) = self.encoder.as_mut() else {
            return false;
        };
        if let Err(e) = encoder.write_all(src) {
            self.window.limit = self.window.cursor;
            return self.state.fail(Status::internal(format!("zstd: {e}")));
        }
        self.window.start_pos += src.len() as u64;
        true
    }
}

impl std::fmt::Debug for ZstdWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZstdWriter")
            .field("state", &self.state)
            .field("window", &self.window)
            .field("out_size", &self.out.size())
            .finish_non_exhaustive()
    }
}
