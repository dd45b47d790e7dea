//! Throughput benchmarks for chain accumulation and framed payload
//! encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vepar::{
    BackwardWriter, ChainBackwardWriter, ChainWriter, CompressionType, Compressor,
    CompressorOptions, LimitingBackwardWriter, Object, Writer,
};

fn generate_text_data(size: usize) -> Vec<u8> {
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    let mut result = Vec::with_capacity(size);
    while result.len() < size {
        result.extend_from_slice(pattern);
    }
    result.truncate(size);
    result
}

fn bench_chain_writer(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_writer");
    for size in [4 * 1024, 64 * 1024, 1024 * 1024] {
        let data = generate_text_data(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("write", size), &data, |b, data| {
            b.iter(|| {
                let mut writer = ChainWriter::new();
                for chunk in data.chunks(256) {
                    writer.write(black_box(chunk));
                }
                writer.close();
                black_box(writer.take_dest())
            });
        });
    }
    group.finish();
}

fn bench_limiting_backward_writer(c: &mut Criterion) {
    let size = 64 * 1024;
    let data = generate_text_data(size);
    let mut group = c.benchmark_group("limiting_backward_writer");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("write_within_limit", |b| {
        b.iter(|| {
            let mut dest = ChainBackwardWriter::new();
            {
                let mut writer = LimitingBackwardWriter::new(&mut dest, size as u64);
                for chunk in data.chunks(256) {
                    writer.write(black_box(chunk));
                }
                writer.close();
            }
            dest.close();
            black_box(dest.take_dest())
        });
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let size = 64 * 1024;
    let data = generate_text_data(size);
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(size as u64));
    for compression_type in [
        CompressionType::None,
        CompressionType::Brotli,
        CompressionType::Zstd,
    ] {
        group.bench_with_input(
            BenchmarkId::new("encode_and_close", compression_type.name()),
            &data,
            |b, data| {
                b.iter(|| {
                    let mut compressor = Compressor::new(
                        CompressorOptions::new(compression_type),
                        data.len() as u64,
                    );
                    compressor.writer().write(black_box(data));
                    let mut dest = ChainWriter::new();
                    compressor.encode_and_close(&mut dest);
                    dest.close();
                    black_box(dest.take_dest())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_chain_writer,
    bench_limiting_backward_writer,
    bench_encode
);
criterion_main!(benches);
