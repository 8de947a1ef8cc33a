//! The context-modeled codec of a region grid.
//!
//! A coded region starts with a header fixing the [shape of the contexts](ContextShape):
//! ```text
//! version: u8 = 0 | context_bits: u8 | neighbor_count: u8 | neighbor_count × (dx: i8, dy: i8, dz: i8)
//! ```
//! followed by the channel stream produced by a [`GridCodec`](grid_codec::GridCodec).

pub mod grid_codec;
pub mod hash;

use std::fmt::Display;
use std::str::FromStr;

use mem_dbg::{MemDbg, MemSize};

use crate::model::context_bucket::DEFAULT_PROMOTION_DIVISOR;
use crate::model::integer_coder::IntegerCoderConfig;
use crate::{CodecError, Result};

/// The only header version understood by this crate.
pub const HEADER_VERSION: u8 = 0;

/// The largest number of neighbors a context can depend on.
pub const MAX_NEIGHBORS: usize = 4;

/// The default number of context bits.
pub const DEFAULT_CONTEXT_BITS: u8 = 12;

/// The offset of a neighbor from the voxel being coded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, MemDbg, MemSize)]
pub struct NeighborOffset {
    pub dx: i8,
    pub dy: i8,
    pub dz: i8,
}

impl NeighborOffset {
    pub const fn new(dx: i8, dy: i8, dz: i8) -> Self {
        Self { dx, dy, dz }
    }

    /// Returns whether the neighbor is always coded before the voxel it is relative to.
    ///
    /// Voxels are coded layer by layer, bottom to top; within a layer, chunk by chunk and
    /// within a chunk row by row, both with z varying slowest. Hence every voxel of a lower
    /// layer is causal, while in the same layer only voxels not ahead along either axis are.
    pub fn is_causal(&self) -> bool {
        self.dy < 0 || (self.dy == 0 && self.dx <= 0 && self.dz <= 0 && (self.dx, self.dz) != (0, 0))
    }
}

impl Display for NeighborOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.dx, self.dy, self.dz)
    }
}

impl FromStr for NeighborOffset {
    type Err = String;

    /// Parses an offset written as `dx,dy,dz`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<i8>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid offset {:?}: {}", s, e))?;
        match parts[..] {
            [dx, dy, dz] => Ok(Self::new(dx, dy, dz)),
            _ => Err(format!("Invalid offset {:?}: expected dx,dy,dz", s)),
        }
    }
}

/// Which neighbors select the context of a voxel, and how many contexts there are.
///
/// This is everything the decoder needs to know about how the encoder modeled the region,
/// and it is what the header stores.
#[derive(Clone, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct ContextShape {
    context_bits: u8,
    neighbors: Vec<NeighborOffset>,
}

impl Default for ContextShape {
    /// One step back along each axis.
    fn default() -> Self {
        Self {
            context_bits: DEFAULT_CONTEXT_BITS,
            neighbors: vec![
                NeighborOffset::new(-1, 0, 0),
                NeighborOffset::new(0, -1, 0),
                NeighborOffset::new(0, 0, -1),
            ],
        }
    }
}

impl ContextShape {
    /// Creates a validated shape.
    pub fn new(context_bits: u8, neighbors: Vec<NeighborOffset>) -> Result<Self> {
        if !(1..=16).contains(&context_bits) {
            return Err(CodecError::InvalidContextBits(context_bits));
        }
        if neighbors.len() > MAX_NEIGHBORS {
            return Err(CodecError::TooManyNeighbors(neighbors.len()));
        }
        if let Some(offset) = neighbors.iter().find(|offset| !offset.is_causal()) {
            return Err(CodecError::NonCausalNeighbor(offset.dx, offset.dy, offset.dz));
        }
        Ok(Self {
            context_bits,
            neighbors,
        })
    }

    pub fn context_bits(&self) -> u8 {
        self.context_bits
    }

    pub fn neighbors(&self) -> &[NeighborOffset] {
        &self.neighbors
    }

    /// Returns the length in bytes of the header of this shape.
    pub fn header_len(&self) -> usize {
        3 + 3 * self.neighbors.len()
    }

    /// Appends the header of this shape to `out`.
    pub fn write_header(&self, out: &mut Vec<u8>) {
        out.push(HEADER_VERSION);
        out.push(self.context_bits);
        out.push(self.neighbors.len() as u8);
        for offset in &self.neighbors {
            out.extend([offset.dx as u8, offset.dy as u8, offset.dz as u8]);
        }
    }

    /// Reads and validates a header at the start of `stream`.
    ///
    /// Returns the shape and the number of bytes the header takes.
    pub fn read_header(stream: &[u8]) -> Result<(Self, usize)> {
        let fixed = stream.get(..3).ok_or(CodecError::TruncatedStream {
            offset: 0,
            needed: 3 - stream.len(),
        })?;
        let (version, context_bits, count) = (fixed[0], fixed[1], fixed[2] as usize);

        if version != HEADER_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        if count > MAX_NEIGHBORS {
            return Err(CodecError::TooManyNeighbors(count));
        }

        let len = 3 + 3 * count;
        let offsets = stream.get(3..len).ok_or(CodecError::TruncatedStream {
            offset: stream.len(),
            needed: len - stream.len(),
        })?;
        let neighbors = offsets
            .chunks_exact(3)
            .map(|offset| NeighborOffset::new(offset[0] as i8, offset[1] as i8, offset[2] as i8))
            .collect();

        Ok((Self::new(context_bits, neighbors)?, len))
    }
}

/// The tuning of the adaptive models. Unlike a [`ContextShape`] it is not stored in the header,
/// so encoder and decoder must agree on it beforehand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct ModelConfig {
    /// The divisor of the promotion bias of the context buckets.
    pub promotion_divisor: u64,
    /// The adaptation speeds of the integer coder of each bucket.
    pub coder: IntegerCoderConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            promotion_divisor: DEFAULT_PROMOTION_DIVISOR,
            coder: IntegerCoderConfig::default(),
        }
    }
}
