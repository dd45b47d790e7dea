//! End-to-end framed payload tests: encode through a [`Compressor`],
//! then decode the frame with the reference decoders.

use std::io::Read;

use proptest::prelude::*;

use vepar::{
    decode_varint64, ChainWriter, CompressionLevel, CompressionType, Compressor,
    CompressorOptions, Object, Writer,
};

fn encode(options: CompressorOptions, input: &[u8]) -> Vec<u8> {
    let mut compressor = Compressor::new(options, input.len() as u64);
    assert!(compressor.writer().write(input));
    let mut dest = ChainWriter::new();
    assert!(compressor.encode_and_close(&mut dest));
    assert!(dest.close());
    dest.dest().to_vec()
}

/// Decode a framed payload back to the original bytes, checking the
/// length prefix along the way.
fn decode(compression_type: CompressionType, framed: &[u8]) -> Vec<u8> {
    if compression_type == CompressionType::None {
        return framed.to_vec();
    }
    let (uncompressed_size, prefix_len) =
        decode_varint64(framed).expect("frame starts with a varint");
    let payload = &framed[prefix_len..];
    let decoded = match compression_type {
        CompressionType::Zstd => zstd::stream::decode_all(payload).expect("valid zstd frame"),
        CompressionType::Brotli => {
            let mut decoded = Vec::new();
            brotli::Decompressor::new(payload, 4096)
                .read_to_end(&mut decoded)
                .expect("valid brotli stream");
            decoded
        }
        CompressionType::None => unreachable!(),
    };
    assert_eq!(decoded.len() as u64, uncompressed_size);
    decoded
}

#[test]
fn zstd_frame_roundtrips_with_length_prefix() {
    let input = b"framed framed framed framed framed".repeat(100);
    let framed = encode(CompressorOptions::new(CompressionType::Zstd), &input);
    assert!(framed.len() < input.len());
    assert_eq!(decode(CompressionType::Zstd, &framed), input);
}

#[test]
fn brotli_frame_roundtrips_with_length_prefix() {
    let input = b"framed framed framed framed framed".repeat(100);
    let framed = encode(CompressorOptions::new(CompressionType::Brotli), &input);
    assert!(framed.len() < input.len());
    assert_eq!(decode(CompressionType::Brotli, &framed), input);
}

#[test]
fn identity_frame_is_the_raw_bytes() {
    let input = b"no prefix, no compression";
    let framed = encode(CompressorOptions::new(CompressionType::None), input);
    assert_eq!(framed, input);
}

#[test]
fn empty_input_zstd_has_zero_prefix() {
    let framed = encode(CompressorOptions::new(CompressionType::Zstd), b"");
    let (uncompressed_size, prefix_len) = decode_varint64(&framed).unwrap();
    assert_eq!(uncompressed_size, 0);
    assert_eq!(prefix_len, 1);
    assert!(decode(CompressionType::Zstd, &framed).is_empty());
}

#[test]
fn multi_megabyte_prefix_spans_several_varint_bytes() {
    let input = vec![0x5au8; 3 * 1024 * 1024];
    let framed = encode(CompressorOptions::new(CompressionType::Zstd), &input);
    let (uncompressed_size, prefix_len) = decode_varint64(&framed).unwrap();
    assert_eq!(uncompressed_size, input.len() as u64);
    assert!(prefix_len > 1);
    assert_eq!(decode(CompressionType::Zstd, &framed), input);
}

#[test]
fn best_level_still_decodes() {
    let input = b"level level level level".repeat(200);
    let options =
        CompressorOptions::new(CompressionType::Zstd).with_level(CompressionLevel::Best);
    let framed = encode(options, &input);
    assert_eq!(decode(CompressionType::Zstd, &framed), input);
}

#[test]
fn reset_allows_a_second_independent_payload() {
    let mut compressor = Compressor::new(CompressorOptions::new(CompressionType::Zstd), 0);
    assert!(compressor.writer().write(b"first payload"));
    let mut first_dest = ChainWriter::new();
    assert!(compressor.encode_and_close(&mut first_dest));
    assert!(first_dest.close());

    compressor.reset();
    assert!(compressor.writer().write(b"second"));
    let mut second_dest = ChainWriter::new();
    assert!(compressor.encode_and_close(&mut second_dest));
    assert!(second_dest.close());

    assert_eq!(
        decode(CompressionType::Zstd, &first_dest.dest().to_vec()),
        b"first payload"
    );
    assert_eq!(
        decode(CompressionType::Zstd, &second_dest.dest().to_vec()),
        b"second"
    );
}

#[test]
fn failed_destination_fails_the_compressor() {
    struct Rejecting {
        state: vepar::ObjectState,
        window: vepar::ForwardWindow,
    }
    impl Object for Rejecting {
        fn state(&self) -> &vepar::ObjectState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut vepar::ObjectState {
            &mut self.state
        }
    }
    impl Writer for Rejecting {
        fn window(&self) -> &vepar::ForwardWindow {
            &self.window
        }
        fn window_mut(&mut self) -> &mut vepar::ForwardWindow {
            &mut self.window
        }
        fn window_bytes(&mut self) -> &mut [u8] {
            &mut []
        }
        fn push_slow(&mut self) -> bool {
            self.fail(vepar::Status::resource_exhausted("no room"))
        }
        fn write_slow(&mut self, _src: &[u8]) -> bool {
            self.fail(vepar::Status::resource_exhausted("no room"))
        }
    }

    let mut compressor = Compressor::new(CompressorOptions::new(CompressionType::Zstd), 0);
    assert!(compressor.writer().write(b"payload"));
    let mut dest = Rejecting {
        state: vepar::ObjectState::new(),
        window: vepar::ForwardWindow::default(),
    };
    assert!(!compressor.encode_and_close(&mut dest));
    assert!(!compressor.healthy());
    assert!(compressor.closed());
}

fn compression_type_strategy() -> impl Strategy<Value = CompressionType> {
    prop_oneof![
        Just(CompressionType::None),
        Just(CompressionType::Brotli),
        Just(CompressionType::Zstd),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 50,
        max_shrink_iters: 100,
        ..ProptestConfig::default()
    })]

    /// Property: any byte sequence survives an encode/decode roundtrip
    /// through any backend.
    #[test]
    fn prop_frame_roundtrip(
        input in prop::collection::vec(any::<u8>(), 0..4096),
        compression_type in compression_type_strategy(),
    ) {
        let framed = encode(CompressorOptions::new(compression_type), &input);
        prop_assert_eq!(decode(compression_type, &framed), input);
    }

    /// Property: the length prefix always matches the input length.
    #[test]
    fn prop_prefix_matches_input_length(
        input in prop::collection::vec(any::<u8>(), 1..4096),
    ) {
        let framed = encode(CompressorOptions::new(CompressionType::Zstd), &input);
        let (uncompressed_size, _) = decode_varint64(&framed).unwrap();
        prop_assert_eq!(uncompressed_size, input.len() as u64);
    }
}
