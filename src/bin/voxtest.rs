use std::hint::black_box;

use anyhow::{ensure, Result};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use voxel_entropy::cli::{CodecArgs, DimensionArgs};
use voxel_entropy::codec::ModelConfig;
use voxel_entropy::grid::Dimensions;
use voxel_entropy::region::{decode_region, encode_region};
use voxel_entropy::utils::{synthetic_terrain, zero_order_entropy};

#[derive(Parser, Debug)]
#[command(about = "Tests speed and effectiveness of the codec on synthetic terrain", long_about = None)]
struct Args {
    /// The number of entries of the palette.
    #[clap(short, long, default_value_t = 300)]
    palette_size: usize,

    /// The seed of the terrain generator.
    #[clap(short, long, default_value_t = 0)]
    seed: u64,

    /// How many times to repeat the test.
    #[clap(short, long, default_value_t = 3)]
    rounds: usize,

    #[clap(flatten)]
    dims: DimensionArgs,

    #[clap(flatten)]
    codec: CodecArgs,
}

pub fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let dims = Dimensions::from(args.dims);
    let shape = args.codec.shape()?;
    let grid = synthetic_terrain(dims, args.palette_size, &mut SmallRng::seed_from_u64(args.seed));
    let voxels = dims.volume() as f64;

    println!(
        "{} voxels, zero-order entropy {:.3} bits/voxel",
        dims.volume(),
        zero_order_entropy(&grid, args.palette_size)
    );

    for round in 0..args.rounds {
        let start = std::time::Instant::now();
        let stream = encode_region(&grid, args.palette_size, shape.clone(), ModelConfig::default(), args.codec.backend)?;
        let encoding = start.elapsed();

        let start = std::time::Instant::now();
        let decoded = black_box(decode_region(
            &stream,
            dims,
            args.palette_size,
            ModelConfig::default(),
            args.codec.backend,
        )?);
        let decoding = start.elapsed();

        ensure!(decoded == grid, "Round {}: the decoded region differs from the original", round);
        // results are in nanos per voxel
        println!(
            "round {}: {:.3} bits/voxel, encoding {:.2} ns/voxel, decoding {:.2} ns/voxel",
            round,
            stream.len() as f64 * 8.0 / voxels,
            encoding.as_nanos() as f64 / voxels,
            decoding.as_nanos() as f64 / voxels,
        );
    }
    Ok(())
}
