use mem_dbg::{MemDbg, MemSize};

use crate::BlockId;

/// The largest number of bits of a context key.
pub const KEY_BITS: usize = 48;

/// The block id standing for neighbors outside of the region.
pub const OUTSIDE: BlockId = BlockId::MAX;

// multipliers of the universal hash
const A0: u64 = 0x9E37_79B9_7F4A_7C15;
const A1: u64 = 0x85EB_CA6B_C2B2_AE35;
const A2: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Packs the block ids of the causal neighbors of a voxel into a key and maps it to one of
/// `2^context_bits` slots.
///
/// Keys are hashed with a pair-multiply-shift hash over their two 32-bit halves: the product
/// `(hi + a0)(lo + a1) + a2` is computed modulo 2⁶⁴, and its top `context_bits` bits, after one
/// xor-shift-multiply round, are the slot.
///
/// This is not the plain three-term 32×32→64-bit form: `a0` and `a1` are full 64-bit constants,
/// so both factors are 64-bit terms, and the finalizing round is applied before the shift. Slots
/// therefore differ from those of the plain form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct ContextHasher {
    context_bits: u8,
    /// How many bits of the key each neighbor gets.
    width: u8,
}

impl ContextHasher {
    /// Creates a hasher for `neighbors` neighbors.
    ///
    /// # Panics
    /// If `context_bits` is not in `1..=16`, or if `neighbors` is larger than 4.
    pub fn new(context_bits: u8, neighbors: usize) -> Self {
        assert!((1..=16).contains(&context_bits), "Invalid context bits {}", context_bits);
        assert!(neighbors <= 4, "Too many neighbors {}", neighbors);
        let width = if neighbors == 0 {
            0
        } else {
            (KEY_BITS / neighbors).min(BlockId::BITS as usize)
        };
        Self {
            context_bits,
            width: width as u8,
        }
    }

    /// Returns the number of slots.
    pub fn slots(&self) -> usize {
        1 << self.context_bits
    }

    /// Packs the given neighbor ids into a key. Ids wider than the space of a neighbor are
    /// truncated.
    #[inline]
    pub fn key(&self, ids: impl IntoIterator<Item = BlockId>) -> u64 {
        let mask = (1_u64 << self.width) - 1;
        ids.into_iter()
            .enumerate()
            .fold(0, |key, (i, id)| key | (id as u64 & mask) << (i * self.width as usize))
    }

    /// Maps a key to its slot.
    #[inline]
    pub fn slot(&self, key: u64) -> usize {
        let lo = key as u32;
        let hi = (key >> 32) as u32;
        let h = A0
            .wrapping_add(hi as u64)
            .wrapping_mul(A1.wrapping_add(lo as u64))
            .wrapping_add(A2);
        let h = (h ^ (h >> 29)).wrapping_mul(A1);
        (h >> (64 - self.context_bits as u32)) as usize
    }
}
