use criterion::{black_box, criterion_group, Criterion, Throughput};
use pprof::criterion::{Output, PProfProfiler};
use rand::prelude::SmallRng;
use rand::SeedableRng;
use voxel_entropy::channel::Backend;
use voxel_entropy::codec::{ContextShape, ModelConfig};
use voxel_entropy::region::{decode_region, encode_region};
use voxel_entropy::utils::synthetic_terrain;

use crate::benchmarks::{DIMS, PALETTE_SIZE};

fn region_benchmark(c: &mut Criterion) {
    let grid = synthetic_terrain(DIMS, PALETTE_SIZE, &mut SmallRng::seed_from_u64(0));

    let mut group = c.benchmark_group("region");
    group.measurement_time(std::time::Duration::from_secs(10));
    group.throughput(Throughput::Elements(DIMS.volume() as u64));
    group.sample_size(10);

    for backend in [Backend::Range, Backend::Uabs] {
        let stream =
            encode_region(&grid, PALETTE_SIZE, ContextShape::default(), ModelConfig::default(), backend).unwrap();

        group.bench_function(format!("encoding ({})", backend), |b| {
            b.iter(|| {
                encode_region(
                    black_box(&grid),
                    PALETTE_SIZE,
                    ContextShape::default(),
                    ModelConfig::default(),
                    backend,
                )
                .unwrap()
            })
        });
        group.bench_function(format!("decoding ({})", backend), |b| {
            b.iter(|| decode_region(black_box(&stream), DIMS, PALETTE_SIZE, ModelConfig::default(), backend).unwrap())
        });
    }
    group.finish();
}

criterion_group! {
    name = grid_codec_benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = region_benchmark
}
