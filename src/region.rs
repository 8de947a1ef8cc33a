//! Whole-region encoding and decoding, and the on-disk form of an encoded region.
//!
//! An encoded region is a header followed by the stream of the chosen [`Backend`]; the
//! dimensions, the palette and the backend itself are known to the caller. A [`RegionPrelude`]
//! bundles all of them so that a region can be stored on its own.

use std::path::Path;

use anyhow::{Context, Result};
use dsi_progress_logger::{ProgressLog, ProgressLogger};
use epserde::prelude::*;
use epserde::Epserde;
use log::info;
use mem_dbg::{MemDbg, MemSize};

use crate::channel::range_coder::{RangeDecoder, RangeEncoder};
use crate::channel::reverse::ReversedEncoder;
use crate::channel::uabs::{UabsDecoder, UabsEncoder};
use crate::channel::Backend;
use crate::codec::grid_codec::GridCodec;
use crate::codec::{ContextShape, ModelConfig};
use crate::grid::{BlockGrid, BlockState, Dimensions, Palette, VoxelGrid};
use crate::utils::zero_order_entropy;
use crate::CodecError;

/// Encodes `grid`, whose ids come from a palette of `palette_size` entries, and returns the
/// header followed by the stream of `backend`.
pub fn encode_region<G: VoxelGrid>(
    grid: &G,
    palette_size: usize,
    shape: ContextShape,
    model: ModelConfig,
    backend: Backend,
) -> crate::Result<Vec<u8>> {
    encode_region_layers(grid, palette_size, shape, model, backend, |_| {})
}

fn encode_region_layers<G: VoxelGrid>(
    grid: &G,
    palette_size: usize,
    shape: ContextShape,
    model: ModelConfig,
    backend: Backend,
    on_layer: impl FnMut(usize),
) -> crate::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(shape.header_len());
    shape.write_header(&mut out);
    let mut codec = GridCodec::new(shape, model, palette_size)?;

    match backend {
        Backend::Range => {
            let mut encoder = RangeEncoder::with_buffer(out);
            codec.encode_layers(grid, &mut encoder, on_layer);
            Ok(encoder.finish())
        }
        Backend::Uabs => {
            // at least one decision per voxel once the palette has two entries
            let decisions = if palette_size > 1 { grid.dimensions().volume() } else { 0 };
            let mut encoder = ReversedEncoder::with_capacity(UabsEncoder::new(), decisions);
            codec.encode_layers(grid, &mut encoder, on_layer);
            out.extend(encoder.flush().finish());
            Ok(out)
        }
    }
}

/// Decodes a region of the given dimensions, whose ids come from a palette of `palette_size`
/// entries, from the bytes produced by [`encode_region`].
///
/// `model` must be the one used to encode the region. The whole of `stream` must be consumed by
/// the region, otherwise the stream is reported as corrupt.
pub fn decode_region(
    stream: &[u8],
    dims: Dimensions,
    palette_size: usize,
    model: ModelConfig,
    backend: Backend,
) -> crate::Result<BlockGrid> {
    decode_region_layers(stream, dims, palette_size, model, backend, |_| {})
}

fn decode_region_layers(
    stream: &[u8],
    dims: Dimensions,
    palette_size: usize,
    model: ModelConfig,
    backend: Backend,
    on_layer: impl FnMut(usize),
) -> crate::Result<BlockGrid> {
    let (shape, header_len) = ContextShape::read_header(stream)?;
    let mut codec = GridCodec::new(shape, model, palette_size)?;
    let mut grid = BlockGrid::new(dims);

    let consumed = match backend {
        Backend::Range => {
            let mut decoder = RangeDecoder::with_offset(stream, header_len)?;
            codec.decode_layers(&mut grid, &mut decoder, on_layer)?;
            decoder.position()
        }
        Backend::Uabs => {
            let mut decoder = UabsDecoder::with_offset(stream, header_len)?;
            codec.decode_layers(&mut grid, &mut decoder, on_layer)?;
            // the state must be back to the initial one once every bit is decoded
            if !decoder.is_exhausted() {
                return Err(CodecError::UnconsumedStream {
                    consumed: decoder.position(),
                    len: stream.len(),
                });
            }
            decoder.position()
        }
    };

    if consumed != stream.len() {
        return Err(CodecError::UnconsumedStream {
            consumed,
            len: stream.len(),
        });
    }
    Ok(grid)
}

/// A self-contained encoded region.
#[derive(Clone, Debug, Epserde, MemDbg, MemSize)]
pub struct RegionPrelude {
    /// The [tag](Backend::tag) of the backend that produced `stream`.
    pub backend: u8,

    /// The number of chunks along the x axis.
    pub chunks_x: usize,

    /// The number of chunks along the z axis.
    pub chunks_z: usize,

    /// The number of layers.
    pub height: usize,

    /// The palette states, sorted.
    pub states: Vec<BlockState>,

    /// The header and the stream of the encoded region.
    pub stream: Vec<u8>,
}

impl RegionPrelude {
    /// Encodes a region.
    pub fn compress(
        grid: &BlockGrid,
        palette: &Palette,
        shape: ContextShape,
        model: ModelConfig,
        backend: Backend,
    ) -> Result<Self> {
        let dims = grid.dimensions();
        let mut pl = ProgressLogger::default();

        pl.item_name("layer").expected_updates(Some(dims.height));
        pl.start(format!("Encoding region with the {} backend...", backend));
        let stream = encode_region_layers(grid, palette.len(), shape, model, backend, |_| pl.update())
            .context("Could not encode the region")?;
        pl.done();

        let volume = dims.volume().max(1) as f64;
        info!(
            "Encoded {} voxels with {} states in {} bytes: {:.3} bits/voxel (zero-order entropy {:.3})",
            dims.volume(),
            palette.len(),
            stream.len(),
            stream.len() as f64 * 8.0 / volume,
            zero_order_entropy(grid, palette.len()),
        );

        Ok(Self {
            backend: backend.tag(),
            chunks_x: dims.chunks_x,
            chunks_z: dims.chunks_z,
            height: dims.height,
            states: palette.states().to_vec(),
            stream,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.chunks_x, self.chunks_z, self.height)
    }

    /// Decodes the region, returning its grid and its palette.
    ///
    /// `model` must be the one used to encode the region.
    pub fn decompress(&self, model: ModelConfig) -> Result<(BlockGrid, Palette)> {
        let backend = Backend::try_from(self.backend)?;
        let palette = Palette::from_states(self.states.iter().copied())?;
        let dims = self.dimensions();
        let mut pl = ProgressLogger::default();

        pl.item_name("layer").expected_updates(Some(dims.height));
        pl.start(format!("Decoding region with the {} backend...", backend));
        let grid = decode_region_layers(&self.stream, dims, palette.len(), model, backend, |_| pl.update())
            .context("Could not decode the region")?;
        pl.done();

        Ok((grid, palette))
    }

    /// Stores the prelude in the file at `path`.
    pub fn store_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.store(path)
            .with_context(|| format!("Could not store the region to {}", path.display()))?;
        Ok(())
    }

    /// Loads a prelude from the file at `path`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::load_full(path).with_context(|| format!("Could not load a region from {}", path.display()))
    }
}
