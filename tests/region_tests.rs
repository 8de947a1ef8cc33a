mod common;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rstest::rstest;
use voxel_entropy::channel::Backend;
use voxel_entropy::codec::{ContextShape, ModelConfig};
use voxel_entropy::grid::{BlockGrid, Dimensions};
use voxel_entropy::region::RegionPrelude;
use voxel_entropy::utils::synthetic_terrain;

use crate::common::*;

/// Raw states of a terrain, with palette ids mapped to sparse state values.
fn get_states(dims: Dimensions) -> Vec<u32> {
    let grid = synthetic_terrain(dims, 40, &mut SmallRng::seed_from_u64(SEED));
    grid.blocks().iter().map(|&id| id as u32 * 97 + 5).collect()
}

#[rstest]
fn prelude_survives_a_store_and_load(#[values(Backend::Range, Backend::Uabs)] backend: Backend) -> anyhow::Result<()> {
    let dims = Dimensions::new(1, 2, 24);
    let states = get_states(dims);
    let (grid, palette) = BlockGrid::from_states(dims, &states)?;

    let prelude = RegionPrelude::compress(&grid, &palette, ContextShape::default(), ModelConfig::default(), backend)?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("region.vox");
    prelude.store_to(&path)?;

    let loaded = RegionPrelude::load_from(&path)?;
    assert_eq!(loaded.backend, backend.tag());
    assert_eq!(loaded.dimensions(), dims);
    assert_eq!(loaded.stream, prelude.stream);

    let (decoded, decoded_palette) = loaded.decompress(ModelConfig::default())?;
    assert_eq!(decoded_palette, palette);
    assert_eq!(decoded, grid);
    assert_eq!(decoded.to_states(&decoded_palette), states);
    Ok(())
}

#[test]
fn prelude_with_unknown_backend_is_rejected() -> anyhow::Result<()> {
    let dims = Dimensions::new(1, 1, 4);
    let (grid, palette) = BlockGrid::from_states(dims, &get_states(dims))?;
    let mut prelude =
        RegionPrelude::compress(&grid, &palette, ContextShape::default(), ModelConfig::default(), Backend::Range)?;

    prelude.backend = 9;
    assert!(prelude.decompress(ModelConfig::default()).is_err());
    Ok(())
}

#[test]
fn prelude_with_corrupt_stream_is_rejected() -> anyhow::Result<()> {
    let dims = Dimensions::new(1, 1, 4);
    let (grid, palette) = BlockGrid::from_states(dims, &get_states(dims))?;
    let mut prelude =
        RegionPrelude::compress(&grid, &palette, ContextShape::default(), ModelConfig::default(), Backend::Uabs)?;

    prelude.stream.push(0);
    assert!(prelude.decompress(ModelConfig::default()).is_err());
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(RegionPrelude::load_from(dir.path().join("missing.vox")).is_err());
}
