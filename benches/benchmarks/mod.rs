use rand::prelude::SmallRng;
use rand::{Rng, SeedableRng};
use voxel_entropy::grid::Dimensions;

pub mod channel;
pub mod grid_codec;

/// Number of decisions used to bench the channels.
const DECISIONS: usize = 1 << 22;

/// Extent of the region used to bench the grid codec.
const DIMS: Dimensions = Dimensions {
    chunks_x: 8,
    chunks_z: 8,
    height: 128,
};

/// Number of entries of the palette of the benched region.
const PALETTE_SIZE: usize = 300;

/// Creates [`DECISIONS`] bits, where a one appears with probability 1/3.
pub fn get_bits() -> Vec<bool> {
    let mut rng = SmallRng::seed_from_u64(0);
    (0..DECISIONS).map(|_| rng.gen_range(0..3) == 0).collect()
}
