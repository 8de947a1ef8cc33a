//! Command-line arguments shared by the binaries.

use anyhow::Result;
use clap::Args;

use crate::channel::Backend;
use crate::codec::{ContextShape, NeighborOffset, DEFAULT_CONTEXT_BITS};
use crate::grid::Dimensions;

/// Args selecting how regions are modeled and coded.
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// The entropy-coding backend.
    #[clap(short, long, value_enum, default_value_t = Backend::Range)]
    pub backend: Backend,

    /// The log2 of the number of contexts, between 1 and 16.
    #[clap(short = 'c', long, default_value_t = DEFAULT_CONTEXT_BITS)]
    pub context_bits: u8,

    /// A causal neighbor offset `dx,dy,dz`; repeat for up to 4 neighbors. Defaults to one step
    /// back along each axis.
    #[clap(short = 'n', long = "neighbor", allow_hyphen_values = true)]
    pub neighbors: Vec<NeighborOffset>,
}

impl CodecArgs {
    /// Returns the validated context shape described by these args.
    pub fn shape(&self) -> Result<ContextShape> {
        let neighbors = if self.neighbors.is_empty() {
            ContextShape::default().neighbors().to_vec()
        } else {
            self.neighbors.clone()
        };
        Ok(ContextShape::new(self.context_bits, neighbors)?)
    }
}

/// Args describing the extent of a region.
#[derive(Args, Debug, Clone, Copy)]
pub struct DimensionArgs {
    /// The number of chunks along the x axis.
    #[clap(long, default_value_t = 32)]
    pub chunks_x: usize,

    /// The number of chunks along the z axis.
    #[clap(long, default_value_t = 32)]
    pub chunks_z: usize,

    /// The number of layers.
    #[clap(long, default_value_t = 256)]
    pub height: usize,
}

impl From<DimensionArgs> for Dimensions {
    fn from(args: DimensionArgs) -> Self {
        Dimensions::new(args.chunks_x, args.chunks_z, args.height)
    }
}
