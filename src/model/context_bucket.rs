use mem_dbg::{MemDbg, MemSize};

use crate::channel::{BitDecoder, BitEncoder};
use crate::model::integer_coder::{BoundedIntegerCoder, IntegerCoderConfig};
use crate::{BlockId, Result};

/// The default divisor of the promotion bias of a [`ContextBucket`].
pub const DEFAULT_PROMOTION_DIVISOR: u64 = 32;

/// The adaptive state of one context: a self-organizing copy of the palette and the integer
/// coder used to code positions in it.
///
/// Every block is coded as its current position in the bucket palette. After each block, the
/// block moves towards the front past every entry whose count does not exceed its own by more
/// than a bias of `1 + hits / promotion_divisor`, where `hits` is the number of blocks coded in
/// this bucket so far.
#[derive(Clone, Debug, MemDbg, MemSize)]
pub struct ContextBucket {
    /// The block ids, in their current order.
    palette: Vec<BlockId>,
    /// The number of occurrences of each block id, indexed by id.
    freq: Vec<u32>,
    hits: u64,
    promotion_divisor: u64,
    coder: BoundedIntegerCoder,
}

impl ContextBucket {
    /// Creates a bucket for a palette of `palette_size` block ids, in their natural order.
    ///
    /// # Panics
    /// If `palette_size` is zero or larger than 2¹⁶, or if `promotion_divisor` is zero.
    pub fn new(palette_size: usize, promotion_divisor: u64, config: IntegerCoderConfig) -> Self {
        assert!(
            palette_size > 0 && palette_size <= 1 << 16,
            "Invalid palette size {}",
            palette_size
        );
        assert!(promotion_divisor > 0, "The promotion divisor must be positive");
        Self {
            palette: (0..palette_size).map(|id| id as BlockId).collect(),
            freq: vec![0; palette_size],
            hits: 0,
            promotion_divisor,
            coder: BoundedIntegerCoder::new(config),
        }
    }

    /// Returns the block ids in their current order.
    pub fn palette(&self) -> &[BlockId] {
        &self.palette
    }

    /// Returns the number of blocks coded with this bucket.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline(always)]
    fn max_index(&self) -> u32 {
        (self.palette.len() - 1) as u32
    }

    /// Encodes `id`.
    ///
    /// # Panics
    /// If `id` is not in the palette.
    pub fn write(&mut self, channel: &mut impl BitEncoder, id: BlockId) {
        let index = self
            .palette
            .iter()
            .position(|&entry| entry == id)
            .unwrap_or_else(|| panic!("Block id {} is outside a palette of {}", id, self.palette.len()));

        self.coder.write(channel, index as u32, self.max_index());
        self.promote(index);
    }

    /// Decodes a block id.
    pub fn read(&mut self, channel: &mut impl BitDecoder) -> Result<BlockId> {
        let index = self.coder.read(channel, self.max_index())? as usize;
        let id = self.palette[index];
        self.promote(index);
        Ok(id)
    }

    /// Records an occurrence of the block at `index` and moves it towards the front.
    fn promote(&mut self, mut index: usize) {
        let id = self.palette[index];
        self.freq[id as usize] += 1;
        self.hits += 1;

        let threshold = self.freq[id as usize] as u64 + 1 + self.hits / self.promotion_divisor;
        while index > 0 && self.freq[self.palette[index - 1] as usize] as u64 <= threshold {
            self.palette[index] = self.palette[index - 1];
            index -= 1;
        }
        self.palette[index] = id;
    }
}
