use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use voxel_entropy::cli::{CodecArgs, DimensionArgs};
use voxel_entropy::codec::ModelConfig;
use voxel_entropy::grid::{BlockGrid, Dimensions};
use voxel_entropy::region::RegionPrelude;

#[derive(Parser, Debug)]
#[command(about = "Compresses a raw region of block states", long_about = None)]
struct Args {
    /// The raw region: little-endian u32 block states, layer by layer, x varying fastest.
    input: PathBuf,

    /// The file to store the compressed region to.
    output: PathBuf,

    #[clap(flatten)]
    dims: DimensionArgs,

    #[clap(flatten)]
    codec: CodecArgs,
}

pub fn main() -> Result<()> {
    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let args = Args::parse();
    let dims = Dimensions::from(args.dims);
    let shape = args.codec.shape()?;

    info!("Loading {}...", args.input.display());
    let bytes = fs::read(&args.input).with_context(|| format!("Could not read {}", args.input.display()))?;
    ensure!(bytes.len() % 4 == 0, "The size of {} is not a multiple of 4", args.input.display());
    let states = bytes
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect::<Vec<_>>();

    let (grid, palette) = BlockGrid::from_states(dims, &states)?;
    let prelude = RegionPrelude::compress(&grid, &palette, shape, ModelConfig::default(), args.codec.backend)?;
    prelude.store_to(&args.output)?;

    info!(
        "Stored {} bytes of states as {} bytes of stream",
        bytes.len(),
        prelude.stream.len()
    );
    Ok(())
}
