//! The voxel data consumed by the codec: a dense grid of palette-relative block ids, and the
//! palette mapping them to raw block states.

use anyhow::{ensure, Context, Result};
use itertools::Itertools;
use mem_dbg::{MemDbg, MemSize};

use crate::{BlockId, CHUNK_SIDE};

/// The type representing a raw block state, as found in the world data.
pub type BlockState = u32;

/// The extent of a region: a rectangle of `chunks_x × chunks_z` chunks, `height` voxels tall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct Dimensions {
    pub chunks_x: usize,
    pub chunks_z: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(chunks_x: usize, chunks_z: usize, height: usize) -> Self {
        Self {
            chunks_x,
            chunks_z,
            height,
        }
    }

    /// The number of voxels along the x axis.
    pub fn size_x(&self) -> usize {
        self.chunks_x * CHUNK_SIDE
    }

    /// The number of voxels along the z axis.
    pub fn size_z(&self) -> usize {
        self.chunks_z * CHUNK_SIDE
    }

    /// The number of voxels in the region.
    pub fn volume(&self) -> usize {
        self.size_x() * self.height * self.size_z()
    }

    /// Returns whether `(x, y, z)` lies in the region.
    #[inline(always)]
    pub fn contains(&self, x: isize, y: isize, z: isize) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.size_x()
            && (y as usize) < self.height
            && (z as usize) < self.size_z()
    }
}

/// Read access to the block ids of a region.
pub trait VoxelGrid {
    fn dimensions(&self) -> Dimensions;

    /// Returns the block id at `(x, y, z)`, which must lie in the region.
    fn get(&self, x: usize, y: usize, z: usize) -> BlockId;
}

/// Write access to the block ids of a region.
pub trait VoxelGridMut: VoxelGrid {
    /// Sets the block id at `(x, y, z)`, which must lie in the region.
    fn set(&mut self, x: usize, y: usize, z: usize, id: BlockId);
}

/// A dense, in-memory [`VoxelGrid`], stored layer by layer with x varying fastest.
#[derive(Clone, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct BlockGrid {
    dims: Dimensions,
    blocks: Vec<BlockId>,
}

impl BlockGrid {
    /// Creates a grid filled with block id zero.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            blocks: vec![0; dims.volume()],
        }
    }

    /// Creates a grid from block ids stored layer by layer with x varying fastest.
    pub fn from_blocks(dims: Dimensions, blocks: Vec<BlockId>) -> Result<Self> {
        ensure!(
            blocks.len() == dims.volume(),
            "Expected {} blocks for {:?}, found {}",
            dims.volume(),
            dims,
            blocks.len()
        );
        Ok(Self { dims, blocks })
    }

    /// Creates a grid and its palette from raw block states stored layer by layer with x
    /// varying fastest.
    pub fn from_states(dims: Dimensions, states: &[BlockState]) -> Result<(Self, Palette)> {
        let palette = Palette::from_states(states.iter().copied())?;
        let blocks = states
            .iter()
            .map(|&state| palette.id_of(state).with_context(|| format!("State {} missing from the palette", state)))
            .collect::<Result<Vec<_>>>()?;
        Ok((Self::from_blocks(dims, blocks)?, palette))
    }

    /// Returns the raw block states of the grid.
    pub fn to_states(&self, palette: &Palette) -> Vec<BlockState> {
        self.blocks.iter().map(|&id| palette.state(id)).collect()
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.dims.size_z() + z) * self.dims.size_x() + x
    }
}

impl VoxelGrid for BlockGrid {
    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline(always)]
    fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.index(x, y, z)]
    }
}

impl VoxelGridMut for BlockGrid {
    #[inline(always)]
    fn set(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        let index = self.index(x, y, z);
        self.blocks[index] = id;
    }
}

/// The finalized set of distinct block states of a region. The block id of a state is its rank
/// in the palette.
#[derive(Clone, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct Palette {
    states: Vec<BlockState>,
}

impl Palette {
    /// The largest number of states a palette can hold.
    pub const MAX_LEN: usize = 1 << 16;

    /// Builds the palette of the given states, sorted by state.
    pub fn from_states(states: impl IntoIterator<Item = BlockState>) -> Result<Self> {
        let states = states.into_iter().sorted_unstable().dedup().collect::<Vec<_>>();
        ensure!(!states.is_empty(), "A palette must contain at least one state");
        ensure!(
            states.len() <= Self::MAX_LEN,
            "Too many distinct block states: {} (at most {})",
            states.len(),
            Self::MAX_LEN
        );
        Ok(Self { states })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[BlockState] {
        &self.states
    }

    /// Returns the block id of `state`, if it is in the palette.
    pub fn id_of(&self, state: BlockState) -> Option<BlockId> {
        self.states
            .binary_search(&state)
            .ok()
            .map(|index| index as BlockId)
    }

    /// Returns the state with block id `id`.
    pub fn state(&self, id: BlockId) -> BlockState {
        self.states[id as usize]
    }
}
