use itertools::iproduct;
use log::debug;
use mem_dbg::{MemDbg, MemSize, SizeFlags};

use crate::channel::{BitDecoder, BitEncoder};
use crate::codec::hash::{ContextHasher, OUTSIDE};
use crate::codec::{ContextShape, ModelConfig};
use crate::grid::{Dimensions, VoxelGrid, VoxelGridMut};
use crate::model::context_bucket::ContextBucket;
use crate::{BlockId, CodecError, Result, CHUNK_SIDE};

/// Codes the block ids of a region grid, one voxel at a time, through a binary channel.
///
/// Voxels are visited layer by layer from the bottom; within a layer chunk by chunk, and within
/// a chunk row by row, with z varying slowest in both cases. The ids of the causal neighbors of
/// each voxel are hashed into one of `2^context_bits` slots, each owning a lazily created
/// [`ContextBucket`] which codes the voxel.
///
/// Buckets live for a single pass: every call to [`encode`](Self::encode) or
/// [`decode`](Self::decode) starts from an empty table.
#[derive(Clone, Debug, MemDbg, MemSize)]
pub struct GridCodec {
    shape: ContextShape,
    model: ModelConfig,
    hasher: ContextHasher,
    palette_size: usize,
    buckets: Vec<Option<ContextBucket>>,
}

impl GridCodec {
    /// Creates a codec for regions whose palette has `palette_size` entries.
    pub fn new(shape: ContextShape, model: ModelConfig, palette_size: usize) -> Result<Self> {
        if palette_size == 0 || palette_size > 1 << 16 {
            return Err(CodecError::InvalidPaletteSize(palette_size));
        }
        let hasher = ContextHasher::new(shape.context_bits(), shape.neighbors().len());
        Ok(Self {
            buckets: vec![None; hasher.slots()],
            shape,
            model,
            hasher,
            palette_size,
        })
    }

    pub fn shape(&self) -> &ContextShape {
        &self.shape
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Returns the number of buckets created during the last pass.
    pub fn buckets_in_use(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_some()).count()
    }

    /// Encodes every voxel of `grid`.
    pub fn encode<G: VoxelGrid>(&mut self, grid: &G, channel: &mut impl BitEncoder) {
        self.encode_layers(grid, channel, |_| {});
    }

    /// Encodes every voxel of `grid`, calling `on_layer` with the index of each completed layer.
    ///
    /// # Panics
    /// If the grid contains a block id outside the palette.
    pub fn encode_layers<G: VoxelGrid>(
        &mut self,
        grid: &G,
        channel: &mut impl BitEncoder,
        mut on_layer: impl FnMut(usize),
    ) {
        self.reset();
        let dims = grid.dimensions();

        for y in 0..dims.height {
            for (x, z) in layer_order(dims) {
                let id = grid.get(x, y, z);
                self.bucket(grid, x, y, z).write(channel, id);
            }
            on_layer(y);
        }
        self.log_pass("Encoded", dims);
    }

    /// Decodes every voxel into `grid`, whose dimensions must be those of the encoded region.
    pub fn decode<G: VoxelGridMut>(&mut self, grid: &mut G, channel: &mut impl BitDecoder) -> Result<()> {
        self.decode_layers(grid, channel, |_| {})
    }

    /// Decodes every voxel into `grid`, calling `on_layer` with the index of each completed layer.
    pub fn decode_layers<G: VoxelGridMut>(
        &mut self,
        grid: &mut G,
        channel: &mut impl BitDecoder,
        mut on_layer: impl FnMut(usize),
    ) -> Result<()> {
        self.reset();
        let dims = grid.dimensions();

        for y in 0..dims.height {
            for (x, z) in layer_order(dims) {
                let id = self.bucket(&*grid, x, y, z).read(channel)?;
                grid.set(x, y, z, id);
            }
            on_layer(y);
        }
        self.log_pass("Decoded", dims);
        Ok(())
    }

    fn reset(&mut self) {
        self.buckets.iter_mut().for_each(|bucket| *bucket = None);
    }

    /// Returns the bucket of the context of the voxel at `(x, y, z)`, creating it if needed.
    #[inline]
    fn bucket<G: VoxelGrid>(&mut self, grid: &G, x: usize, y: usize, z: usize) -> &mut ContextBucket {
        let slot = self.hasher.slot(self.hasher.key(self.neighbor_ids(grid, x, y, z)));
        let (palette_size, model) = (self.palette_size, self.model);
        self.buckets[slot]
            .get_or_insert_with(|| ContextBucket::new(palette_size, model.promotion_divisor, model.coder))
    }

    /// Returns the ids of the neighbors of `(x, y, z)`, with [`OUTSIDE`] for those outside the grid.
    fn neighbor_ids<'a, G: VoxelGrid>(
        &'a self,
        grid: &'a G,
        x: usize,
        y: usize,
        z: usize,
    ) -> impl Iterator<Item = BlockId> + 'a {
        let dims = grid.dimensions();
        self.shape.neighbors().iter().map(move |offset| {
            let nx = x as isize + offset.dx as isize;
            let ny = y as isize + offset.dy as isize;
            let nz = z as isize + offset.dz as isize;
            if dims.contains(nx, ny, nz) {
                grid.get(nx as usize, ny as usize, nz as usize)
            } else {
                OUTSIDE
            }
        })
    }

    fn log_pass(&self, what: &str, dims: Dimensions) {
        debug!(
            "{} {} voxels with {} of {} contexts ({} bytes of model state)",
            what,
            dims.volume(),
            self.buckets_in_use(),
            self.buckets.len(),
            self.buckets.mem_size(SizeFlags::default())
        );
    }
}

/// Returns the horizontal coordinates of a layer in coding order.
fn layer_order(dims: Dimensions) -> impl Iterator<Item = (usize, usize)> {
    iproduct!(0..dims.chunks_z, 0..dims.chunks_x, 0..CHUNK_SIDE, 0..CHUNK_SIDE)
        .map(|(cz, cx, lz, lx)| (cx * CHUNK_SIDE + lx, cz * CHUNK_SIDE + lz))
}
