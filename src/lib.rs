//! Lossless compression of voxel block-ID grids.
//!
//! Every voxel is coded as an index into a per-context, frequency-ordered copy of the region
//! palette. Contexts are selected by hashing already-coded neighbors, indices are turned into
//! adaptive binary decisions, and the decisions are entropy coded by one of two interchangeable
//! [channels](channel): a carry-less range coder or a uABS coder.

pub mod channel;
pub mod cli;
pub mod codec;
pub mod error;
pub mod grid;
pub mod model;
pub mod region;
pub mod utils;

pub use error::{CodecError, Result};

/// Log2 of the probability precision.
pub const K_LOG2: usize = 16;

/// The probability precision: a probability `p` stands for `p / K`.
pub const K: u32 = 1 << K_LOG2;

/// The type representing the probability of a bit being zero, scaled by [`K`].
pub type Prob = u16;

/// The type representing a palette-relative block identifier.
///
/// Block identifiers are assigned by the region [palette](grid::Palette) and are bounded to 16 bits,
/// which is also the precision ceiling of the [integer coder](model::integer_coder::BoundedIntegerCoder).
pub type BlockId = u16;

/// Side length of the square horizontal footprint of a chunk.
pub const CHUNK_SIDE: usize = 16;
