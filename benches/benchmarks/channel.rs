use criterion::{black_box, criterion_group, BatchSize, Criterion, Throughput};
use pprof::criterion::{Output, PProfProfiler};
use voxel_entropy::channel::range_coder::{RangeDecoder, RangeEncoder};
use voxel_entropy::channel::reverse::ReversedEncoder;
use voxel_entropy::channel::uabs::{UabsDecoder, UabsEncoder};
use voxel_entropy::channel::{BitDecoder, BitEncoder};
use voxel_entropy::model::bit_model::AdaptiveBitModel;

use crate::benchmarks::get_bits;

fn encode_benchmark(c: &mut Criterion) {
    let bits = get_bits();

    let mut group = c.benchmark_group("channel encoding");
    group.throughput(Throughput::Elements(bits.len() as u64));
    group.sample_size(10);
    group.bench_function("range", |b| {
        b.iter(|| {
            let mut model = AdaptiveBitModel::default();
            let mut encoder = RangeEncoder::new();
            bits.iter().for_each(|&bit| model.write(&mut encoder, bit));
            black_box(encoder.finish())
        })
    });
    group.bench_function("uabs", |b| {
        b.iter(|| {
            let mut model = AdaptiveBitModel::default();
            let mut encoder = ReversedEncoder::new(UabsEncoder::new());
            bits.iter().for_each(|&bit| model.write(&mut encoder, bit));
            black_box(encoder.flush().finish())
        })
    });
    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let bits = get_bits();

    let mut model = AdaptiveBitModel::default();
    let mut encoder = RangeEncoder::new();
    bits.iter().for_each(|&bit| model.write(&mut encoder, bit));
    let range_stream = encoder.finish();

    let mut model = AdaptiveBitModel::default();
    let mut encoder = ReversedEncoder::new(UabsEncoder::new());
    bits.iter().for_each(|&bit| model.write(&mut encoder, bit));
    let uabs_stream = encoder.flush().finish();

    let mut group = c.benchmark_group("channel decoding");
    group.throughput(Throughput::Elements(bits.len() as u64));
    group.sample_size(10);
    group.bench_function("range", |b| {
        b.iter_batched(
            || RangeDecoder::new(&range_stream).unwrap(),
            |mut decoder| {
                let mut model = AdaptiveBitModel::default();
                for _ in 0..bits.len() {
                    black_box(model.read(&mut decoder).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("uabs", |b| {
        b.iter_batched(
            || UabsDecoder::new(&uabs_stream).unwrap(),
            |mut decoder| {
                let mut model = AdaptiveBitModel::default();
                for _ in 0..bits.len() {
                    black_box(model.read(&mut decoder).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group! {
    name = channel_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = encode_benchmark, decode_benchmark
}
