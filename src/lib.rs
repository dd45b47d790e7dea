//! # Vepar
//!
//! Streaming byte-I/O primitives for record-oriented storage.
//!
//! Vepar is named after the 42nd demon of the Ars Goetia, a Duke who
//! governs the waters and guides laden ships - fitting for a library
//! whose job is steering streams of bytes safely into storage.
//!
//! ## Design Philosophy
//!
//! - **Zero-copy where possible**: composed writer layers share buffer
//!   windows instead of copying between them
//! - **Fail-once lifecycles**: every I/O object tracks health; the first
//!   failure is recorded race-safely and is permanent
//! - **Explicit ownership**: a layer either owns its destination (and
//!   closes it exactly once) or borrows one that outlives it
//!
//! ## Core Pieces
//!
//! - [`Object`] / [`Status`] - health tracking and the close-once protocol
//! - [`Writer`] / [`BackwardWriter`] - buffered fast/slow-path byte sinks
//! - [`ChainWriter`] / [`ChainBackwardWriter`] - in-memory accumulators
//! - [`Dependency`] - owned-or-borrowed destination wrapper
//! - [`LimitingBackwardWriter`] - absolute size ceiling over a destination
//! - [`Compressor`] - framed, optionally length-prefixed compressed payloads
//!
//! ## Example
//!
//! ```
//! use vepar::{ChainWriter, CompressionType, Compressor, CompressorOptions, Object, Writer};
//!
//! let mut compressor = Compressor::new(CompressorOptions::new(CompressionType::None), 0);
//! assert!(compressor.writer().write(b"hello"));
//!
//! let mut dest = ChainWriter::new();
//! assert!(compressor.encode_and_close(&mut dest));
//! assert!(dest.close());
//! assert_eq!(dest.dest().to_vec(), b"hello");
//! ```

pub mod backward_writer;
pub mod buffer;
pub mod chain;
pub mod chain_backward_writer;
pub mod chain_writer;
pub mod compress;
pub mod dependency;
pub mod limiting_backward_writer;
pub mod object;
pub mod status;
pub mod varint;
pub mod writer;

pub use backward_writer::BackwardWriter;
pub use buffer::{BackwardWindow, ForwardWindow};
pub use chain::Chain;
pub use chain_backward_writer::ChainBackwardWriter;
pub use chain_writer::ChainWriter;
pub use compress::{
    BrotliWriter, CompressionLevel, CompressionType, Compressor, CompressorOptions, ZstdWriter,
};
pub use dependency::Dependency;
pub use limiting_backward_writer::LimitingBackwardWriter;
pub use object::{Health, Object, ObjectState, TypeTag};
pub use status::{Status, StatusKind};
pub use varint::{decode_varint64, encode_varint64, write_varint64, MAX_VARINT64_LEN};
pub use writer::Writer;

/// Default staging buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Smallest scratch block an accumulator allocates.
pub const MIN_BLOCK_SIZE: usize = 256;

/// Largest scratch block an accumulator allocates (64 KiB).
pub const MAX_BLOCK_SIZE: usize = 64 * 1024;

/// Clamp a block size to the valid range.
#[inline]
pub fn clamp_block_size(size: usize) -> usize {
    size.clamp(MIN_BLOCK_SIZE, MAX_BLOCK_SIZE)
}
