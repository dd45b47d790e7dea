//! Brotli backend writer.
//!
//! Same staging shape as the Zstandard backend, feeding a `brotli`
//! streaming encoder writing into an owned accumulator.

use std::io::Write as _;

use crate::buffer::ForwardWindow;
use crate::chain::Chain;
use crate::object::{Object, ObjectState, TypeTag};
use crate::status::Status;
use crate::writer::Writer;
use crate::DEFAULT_BUFFER_SIZE;

const BROTLI_LG_WINDOW_SIZE: u32 = 22;

/// A buffered [`Writer`] compressing with Brotli.
pub struct BrotliWriter {
    state: ObjectState,
    buf: Vec<u8>,
    window: ForwardWindow,
    encoder: Option<brotli::CompressorWriter<Vec<u8>>>,
    out: Chain,
}

impl BrotliWriter {
    /// Create a writer at the given numeric quality; `size_hint`
    /// estimates the total uncompressed size for accumulator pre-sizing.
    pub fn new(quality: i32, size_hint: u64) -> Self {
        let accumulator = Vec::with_capacity(size_hint.min(DEFAULT_BUFFER_SIZE as u64) as usize);
        let encoder = brotli::CompressorWriter::new(
            accumulator,
            4096,
            quality as u32,
            BROTLI_LG_WINDOW_SIZE,
        );
        BrotliWriter {
            state: ObjectState::new(),
            buf: vec![0; DEFAULT_BUFFER_SIZE],
            window: ForwardWindow {
                start: 0,
                cursor: 0,
                limit: DEFAULT_BUFFER_SIZE,
                start_pos: 0,
            },
            encoder: Some(encoder),
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
            return self.state.fail(Status::internal(format!("brotli: {e}")));
        }
        self.window.start_pos += filled as u64;
        self.window.cursor = 0;
        true
    }
}

impl Object for BrotliWriter {
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
            // into_inner terminates the stream and hands back the
            // accumulator.
            let bytes = encoder.into_inner();
            if flushed {
                self.out = Chain::from(bytes);
            }
        }
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of("BrotliWriter")
    }
}

impl Writer for BrotliWriter {
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
            return self.state.fail(Status::internal(format!("brotli: {e}")));
        }
        self.window.start_pos += src.len() as u64;
        true
    }
}

impl std::fmt::Debug for BrotliWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrotliWriter")
            .field("state", &self.state)
            .field("window", &self.window)
            .field("out_size", &self.out.size())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn decompress(compressed: &[u8]) -> Vec<u8> {
        let mut decoded = Vec::new();
        brotli::Decompressor::new(compressed, 4096)
            .read_to_end(&mut decoded)
            .unwrap();
        decoded
    }

    #[test]
    fn test_roundtrip_through_reference_decoder() {
        let mut writer = BrotliWriter::new(6, 0);
        let input = b"brotli brotli brotli brotli".repeat(64);
        assert!(writer.write(&input));
        assert_eq!(writer.pos(), input.len() as u64);
        assert!(writer.close());
        let compressed = writer.take_output().to_vec();
        assert!(!compressed.is_empty());
        assert_eq!(decompress(&compressed), input);
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut writer = BrotliWriter::new(6, 0);
        assert!(writer.write(b"data"));
        assert!(writer.close());
        assert_eq!(writer.available(), 0);
        assert!(!writer.write(b"lost"));
        assert_eq!(decompress(&writer.take_output().to_vec()), b"data");
    }

    #[test]
    fn test_empty_input() {
        let mut writer = BrotliWriter::new(6, 0);
        assert!(writer.close());
        let compressed = writer.take_output().to_vec();
        assert!(decompress(&compressed).is_empty());
    }
}
