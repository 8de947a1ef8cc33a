use criterion::criterion_main;

mod benchmarks;

criterion_main! {
    benchmarks::channel::channel_benches,
    benchmarks::grid_codec::grid_codec_benches,
}
