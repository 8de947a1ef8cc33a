use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use voxel_entropy::codec::ModelConfig;
use voxel_entropy::region::RegionPrelude;

#[derive(Parser, Debug)]
#[command(about = "Decompresses a region to raw block states", long_about = None)]
struct Args {
    /// The compressed region.
    input: PathBuf,

    /// The file to write the raw region to: little-endian u32 block states, layer by layer,
    /// x varying fastest.
    output: PathBuf,
}

pub fn main() -> Result<()> {
    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let args = Args::parse();

    let prelude = RegionPrelude::load_from(&args.input)?;
    let (grid, palette) = prelude.decompress(ModelConfig::default())?;

    let bytes = grid
        .to_states(&palette)
        .into_iter()
        .flat_map(u32::to_le_bytes)
        .collect::<Vec<_>>();
    fs::write(&args.output, &bytes).with_context(|| format!("Could not write {}", args.output.display()))?;

    info!("Wrote {:?} region to {}", prelude.dimensions(), args.output.display());
    Ok(())
}
