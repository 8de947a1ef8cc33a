use std::ops::Neg;

use rand::Rng;

use crate::grid::{BlockGrid, Dimensions, VoxelGrid, VoxelGridMut};
use crate::BlockId;

/// Returns the empirical entropy, in bits per symbol, of the distribution of frequencies `distr`
/// summing to `total_freq`.
pub fn entropy(distr: &[usize], total_freq: f64) -> f64 {
    let mut entropy = 0.0;

    for &freq in distr {
        if freq == 0 {
            continue;
        }
        let pr = freq as f64 / total_freq;
        entropy += pr * f64::log2(pr);
    }
    entropy.neg()
}

/// Returns the number of occurrences of each block id of a grid whose palette has `palette_size`
/// entries.
pub fn block_histogram(grid: &BlockGrid, palette_size: usize) -> Vec<usize> {
    let mut histogram = vec![0; palette_size];
    grid.blocks().iter().for_each(|&id| histogram[id as usize] += 1);
    histogram
}

/// Returns the zero-order entropy of the block ids of `grid`, in bits per voxel: the cost a
/// context-free static model would pay.
pub fn zero_order_entropy(grid: &BlockGrid, palette_size: usize) -> f64 {
    let volume = grid.dimensions().volume();
    if volume == 0 {
        return 0.0;
    }
    entropy(&block_histogram(grid, palette_size), volume as f64)
}

/// Generates a terrain-like grid with ids from a palette of `palette_size` entries.
///
/// Id 0 is air above a wavy ground level, ids 1 to 3 are layered ground, and the remaining ids
/// are scattered as ores with decreasing probability.
pub fn synthetic_terrain(dims: Dimensions, palette_size: usize, rng: &mut impl Rng) -> BlockGrid {
    assert!(palette_size > 0 && palette_size <= 1 << 16, "Invalid palette size {}", palette_size);
    let mut grid = BlockGrid::new(dims);
    let ground = dims.height / 2;
    let layered = (palette_size - 1).min(3) as BlockId;

    for z in 0..dims.size_z() {
        for x in 0..dims.size_x() {
            let wave = ((x as f64 / 11.0).sin() + (z as f64 / 7.0).cos()) * 2.0;
            let level = (ground as f64 + wave).max(0.0) as usize;
            for y in 0..dims.height.min(level) {
                let depth = level - y;
                let mut id = match depth {
                    1 => 1,
                    2..=4 => 2,
                    _ => 3,
                }
                .min(layered);
                if palette_size > 4 && depth > 4 && rng.gen_ratio(1, 8) {
                    // roughly geometric over the ore ids
                    let span = (palette_size - 4) as f64;
                    let pick = (rng.gen::<f64>().powi(3) * span) as usize;
                    id = (4 + pick.min(palette_size - 5)) as BlockId;
                }
                grid.set(x, y, z, id);
            }
        }
    }
    grid
}
