use mem_dbg::{MemDbg, MemSize};

use crate::channel::{BitDecoder, BitEncoder};
use crate::{Prob, Result, K};

/// The adaptation speed of an [`AdaptiveBitModel`].
///
/// The `n`-th observation moves the estimate by `1 / (min(n, limit) + delta)` of its distance
/// from the observed outcome: a larger `delta` makes the first observations count less, a larger
/// `limit` makes the estimate slower to change once many observations have been seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct Adaptation {
    limit: u16,
    delta: u16,
}

impl Adaptation {
    /// A model that trusts its prior and changes slowly.
    pub const SLOW: Self = Self::new(48, 21);

    /// A model that adapts quickly but settles with a long memory.
    pub const MEDIUM: Self = Self::new(32, 4);

    /// A model that adapts quickly and keeps a short memory.
    pub const FAST: Self = Self::new(16, 4);

    /// # Panics
    /// If `limit` or `delta` is zero. Every update then divides by at least two, so the estimate
    /// never reaches a certainty.
    pub const fn new(limit: u16, delta: u16) -> Self {
        assert!(limit > 0, "limit must be positive");
        assert!(delta > 0, "delta must be positive");
        Self { limit, delta }
    }

    pub const fn limit(&self) -> u16 {
        self.limit
    }

    pub const fn delta(&self) -> u16 {
        self.delta
    }
}

/// An adaptive estimate of the probability that a binary decision is zero.
///
/// The estimate is kept in `[1, K)` and scaled by [`K`], so that it can be handed to a channel
/// as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct AdaptiveBitModel {
    /// The probability of a zero, scaled by `K`.
    value: u16,
    /// How many observations have been seen, saturated at `limit`.
    count: u16,
    limit: u16,
    delta: u16,
}

impl Default for AdaptiveBitModel {
    fn default() -> Self {
        Self::new(Adaptation::MEDIUM)
    }
}

impl AdaptiveBitModel {
    /// Creates a model with no prior, i.e., both outcomes equally likely.
    pub fn new(adaptation: Adaptation) -> Self {
        Self::with_prior((K / 2) as Prob, adaptation)
    }

    /// Creates a model whose initial probability of a zero is `p0 / K`.
    ///
    /// # Panics
    /// If `p0` is zero.
    pub fn with_prior(p0: Prob, adaptation: Adaptation) -> Self {
        assert!(p0 != 0, "The prior probability must be positive");
        Self {
            value: p0,
            count: 0,
            limit: adaptation.limit,
            delta: adaptation.delta,
        }
    }

    /// Returns the current probability of a zero, scaled by `K`.
    #[inline(always)]
    pub fn p0(&self) -> Prob {
        self.value
    }

    /// Updates the estimate with an observed outcome.
    #[inline]
    pub fn update(&mut self, bit: bool) {
        if self.count < self.limit {
            self.count += 1;
        }
        let target = if bit { 0 } else { K as i32 };
        let value = self.value as i32;
        let rate = self.count as i32 + self.delta as i32;
        self.value = (value + (target - value) / rate) as u16;
    }

    /// Encodes `bit` with the current estimate, then updates it.
    #[inline]
    pub fn write(&mut self, channel: &mut impl BitEncoder, bit: bool) {
        channel.encode_bit(bit, self.value);
        self.update(bit);
    }

    /// Decodes a bit with the current estimate, then updates it.
    #[inline]
    pub fn read(&mut self, channel: &mut impl BitDecoder) -> Result<bool> {
        let bit = channel.decode_bit(self.value)?;
        self.update(bit);
        Ok(bit)
    }
}
