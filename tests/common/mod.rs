/*
 * Utility functions and consts used by the tests.
 *
 */

use rand::prelude::{Distribution, SmallRng};
use rand::{Rng, SeedableRng};
use rand_distr::Zipf;
use voxel_entropy::channel::range_coder::{RangeDecoder, RangeEncoder};
use voxel_entropy::channel::reverse::ReversedEncoder;
use voxel_entropy::channel::uabs::{UabsDecoder, UabsEncoder};
use voxel_entropy::channel::{Backend, BitDecoder, BitEncoder};
use voxel_entropy::grid::{BlockGrid, Dimensions};
use voxel_entropy::{BlockId, Prob, K};

pub const SEED: u64 = 1234;

/// Creates `len` bits where a one appears with probability 1/3.
pub fn get_biased_bits(len: usize, seed: u64) -> Vec<bool> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..3) == 0).collect()
}

/// Returns the fraction of zeros in `bits` scaled by [`K`], clamped to a codable probability.
pub fn get_empirical_p0(bits: &[bool]) -> Prob {
    let zeros = bits.iter().filter(|&&bit| !bit).count() as u64;
    let p0 = zeros * K as u64 / bits.len().max(1) as u64;
    p0.clamp(1, K as u64 - 1) as Prob
}

/// Creates a grid whose ids follow a Zipfian distribution over a palette of `palette_size`
/// entries.
pub fn get_zipf_grid(dims: Dimensions, palette_size: usize, seed: u64) -> BlockGrid {
    let mut rng = SmallRng::seed_from_u64(seed);
    let distribution = Zipf::new(palette_size as u64, 1.0).unwrap();
    let blocks = (0..dims.volume())
        .map(|_| (distribution.sample(&mut rng) as usize - 1).min(palette_size - 1) as BlockId)
        .collect();
    BlockGrid::from_blocks(dims, blocks).unwrap()
}

/// Runs `write` on an encoder of `backend` and returns the resulting stream.
pub fn encode_with(backend: Backend, write: impl FnOnce(&mut dyn BitEncoder)) -> Vec<u8> {
    match backend {
        Backend::Range => {
            let mut encoder = RangeEncoder::new();
            write(&mut encoder);
            encoder.finish()
        }
        Backend::Uabs => {
            let mut encoder = ReversedEncoder::new(UabsEncoder::new());
            write(&mut encoder);
            encoder.flush().finish()
        }
    }
}

/// Runs `read` on a decoder of `backend` over `stream`, checking that the whole stream is
/// consumed.
pub fn decode_with<T>(backend: Backend, stream: &[u8], read: impl FnOnce(&mut dyn BitDecoder) -> T) -> T {
    match backend {
        Backend::Range => {
            let mut decoder = RangeDecoder::new(stream).unwrap();
            let result = read(&mut decoder);
            assert_eq!(decoder.position(), stream.len());
            result
        }
        Backend::Uabs => {
            let mut decoder = UabsDecoder::new(stream).unwrap();
            let result = read(&mut decoder);
            assert!(decoder.is_exhausted());
            assert_eq!(decoder.position(), stream.len());
            result
        }
    }
}
