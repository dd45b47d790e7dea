//! Compressed-payload production.
//!
//! A [`Compressor`] multiplexes among interchangeable backend writers
//! (identity pass-through, Brotli, or Zstandard), accumulating the
//! backend's output in memory. [`Compressor::encode_and_close`] emits the
//! framed payload:
//!
//! ```text
//! [uncompressed_size : varint]   only when the backend is not identity
//! [payload bytes]                compressed, or raw for identity
//! ```
//!
//! Exactly one backend is active at any time, matching the configured
//! options.

mod brotli;
mod options;
mod zstd;

pub use self::brotli::BrotliWriter;
pub use self::options::{CompressionLevel, CompressionType, CompressorOptions};
pub use self::zstd::ZstdWriter;

use tracing::debug;

use crate::chain::Chain;
use crate::chain_writer::ChainWriter;
use crate::object::{Object, ObjectState, TypeTag};
use crate::status::Status;
use crate::varint::write_varint64;
use crate::writer::Writer;

/// The active backend. The variant always matches the configured
/// compression type.
#[derive(Debug)]
enum BackendWriter {
    Identity(ChainWriter),
    Brotli(BrotliWriter),
    Zstd(ZstdWriter),
}

impl BackendWriter {
    fn new(options: CompressorOptions, size_hint: u64) -> Self {
        let level = options.numeric_level();
        match options.compression_type {
            CompressionType::None => {
                BackendWriter::Identity(ChainWriter::with_size_hint(size_hint))
            }
            CompressionType::Brotli => BackendWriter::Brotli(BrotliWriter::new(level, size_hint)),
            CompressionType::Zstd => BackendWriter::Zstd(ZstdWriter::new(level, size_hint)),
        }
    }

    fn writer_mut(&mut self) -> &mut dyn Writer {
        match self {
            BackendWriter::Identity(writer) => writer,
            BackendWriter::Brotli(writer) => writer,
            BackendWriter::Zstd(writer) => writer,
        }
    }

    fn close(&mut self) -> bool {
        match self {
            BackendWriter::Identity(writer) => writer.close(),
            BackendWriter::Brotli(writer) => writer.close(),
            BackendWriter::Zstd(writer) => writer.close(),
        }
    }

    fn status(&self) -> Status {
        match self {
            BackendWriter::Identity(writer) => writer.status(),
            BackendWriter::Brotli(writer) => writer.status(),
            BackendWriter::Zstd(writer) => writer.status(),
        }
    }

    fn take_output(&mut self) -> Chain {
        match self {
            BackendWriter::Identity(writer) => writer.take_dest(),
            BackendWriter::Brotli(writer) => writer.take_output(),
            BackendWriter::Zstd(writer) => writer.take_output(),
        }
    }
}

/// Accumulates a stream of bytes and emits it as a framed, optionally
/// compressed payload. Single use past
/// [`encode_and_close`](Compressor::encode_and_close);
/// [`reset`](Compressor::reset) returns it to empty for reuse.
#[derive(Debug)]
pub struct Compressor {
    state: ObjectState,
    options: CompressorOptions,
    size_hint: u64,
    backend: BackendWriter,
}

impl Compressor {
    /// Create an empty compressor. `size_hint` estimates the total
    /// uncompressed size and pre-sizes the accumulator.
    pub fn new(options: CompressorOptions, size_hint: u64) -> Self {
        Compressor {
            state: ObjectState::new(),
            options,
            size_hint,
            backend: BackendWriter::new(options, size_hint),
        }
    }

    /// The configured options.
    #[inline]
    pub fn options(&self) -> CompressorOptions {
        self.options
    }

    /// The writer uncompressed data should be written to.
    ///
    /// # Panics
    ///
    /// Panics if the compressor is not healthy.
    pub fn writer(&mut self) -> &mut dyn Writer {
        assert!(
            self.state.healthy(),
            "Compressor::writer(): compressor closed or failed"
        );
        self.backend.writer_mut()
    }

    /// Discard accumulated output and return to the empty state, keeping
    /// the same options.
    pub fn reset(&mut self) {
        self.state.reset();
        self.backend = BackendWriter::new(self.options, self.size_hint);
    }

    /// Finalize the backend and write the framed payload to `dest`.
    /// Always closes the compressor.
    ///
    /// Returns `true` on success. On failure the compressor is unhealthy
    /// and `dest` contents are unspecified; no attempt is made to undo
    /// partial writes.
    pub fn encode_and_close<W: Writer + ?Sized>(&mut self, dest: &mut W) -> bool {
        if !self.state.healthy() {
            let _ = self.close();
            return false;
        }
        let uncompressed_size = self.backend.writer_mut().pos();
        if !self.backend.close() {
            let backend_status = self.backend.status();
            if backend_status.is_ok() {
                self.state
                    .fail(Status::internal("compression backend failed"));
            } else {
                self.state.fail(backend_status);
            }
            let _ = self.close();
            return false;
        }
        let output = self.backend.take_output();
        debug!(
            compression = self.options.compression_type.name(),
            uncompressed_size,
            payload_size = output.size(),
            "encoding compressed payload"
        );
        if self.options.compression_type != CompressionType::None
            && !write_varint64(dest, uncompressed_size)
        {
            self.fail_from_dest(dest);
            let _ = self.close();
            return false;
        }
        if !dest.write_chain_owned(output) {
            self.fail_from_dest(dest);
            let _ = self.close();
            return false;
        }
        self.close()
    }

    /// Adopt the destination's failure, with a fallback for the
    /// defensive case where the destination looks healthy anyway.
    fn fail_from_dest<W: Writer + ?Sized>(&self, dest: &W) {
        let dest_status = dest.status();
        if !dest.healthy() && !dest_status.is_ok() {
            self.state.fail(dest_status);
        } else {
            self.state
                .fail(Status::internal("write to compressor destination failed"));
        }
    }
}

impl Object for Compressor {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn done(&mut self) {
        let _ = self.backend.close();
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of("Compressor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough_no_prefix() {
        let mut compressor = Compressor::new(CompressorOptions::new(CompressionType::None), 0);
        assert!(compressor.writer().write(b"hello"));
        let mut dest = ChainWriter::new();
        assert!(compressor.encode_and_close(&mut dest));
        assert!(compressor.closed());
        assert!(dest.close());
        assert_eq!(dest.dest().to_vec(), b"hello");
    }

    #[test]
    #[should_panic(expected = "closed or failed")]
    fn test_writer_after_encode_panics() {
        let mut compressor = Compressor::new(CompressorOptions::new(CompressionType::None), 0);
        let mut dest = ChainWriter::new();
        compressor.encode_and_close(&mut dest);
        let _ = compressor.writer();
    }

    #[test]
    fn test_reset_discards_accumulated_output() {
        let mut compressor = Compressor::new(CompressorOptions::new(CompressionType::None), 0);
        assert!(compressor.writer().write(b"discarded"));
        compressor.reset();
        assert!(compressor.writer().write(b"kept"));
        let mut dest = ChainWriter::new();
        assert!(compressor.encode_and_close(&mut dest));
        assert!(dest.close());
        assert_eq!(dest.dest().to_vec(), b"kept");
    }

    #[test]
    fn test_reset_recovers_health() {
        let mut compressor = Compressor::new(CompressorOptions::default(), 0);
        compressor.fail(Status::internal("injected"));
        assert!(!compressor.healthy());
        compressor.reset();
        assert!(compressor.healthy());
    }

    #[test]
    fn test_encode_after_failure_returns_false_and_closes() {
        let mut compressor = Compressor::new(CompressorOptions::default(), 0);
        compressor.fail(Status::internal("injected"));
        let mut dest = ChainWriter::new();
        assert!(!compressor.encode_and_close(&mut dest));
        assert!(compressor.closed());
        assert!(!compressor.healthy());
    }

    #[test]
    fn test_backend_matches_options() {
        let mut zstd = Compressor::new(CompressorOptions::new(CompressionType::Zstd), 0);
        assert_eq!(zstd.writer().type_tag(), TypeTag::of("ZstdWriter"));
        let mut brotli = Compressor::new(CompressorOptions::new(CompressionType::Brotli), 0);
        assert_eq!(brotli.writer().type_tag(), TypeTag::of("BrotliWriter"));
        let mut identity = Compressor::new(CompressorOptions::new(CompressionType::None), 0);
        assert_eq!(identity.writer().type_tag(), TypeTag::of("ChainWriter"));
    }
}
