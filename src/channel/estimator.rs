use crate::channel::BitEncoder;
use crate::{Prob, K};

/// A [`BitEncoder`] that writes nothing and only accumulates the ideal cost, in bits, of the
/// decisions it is given, that is, the sum of their self-information.
///
/// Useful to measure a model without paying for an actual backend.
#[derive(Clone, Debug, Default)]
pub struct EntropyEstimator {
    /// The number of coded decisions.
    decisions: u64,
    /// The accumulated self-information, in bits.
    cost: f64,
}

impl EntropyEstimator {
    /// Returns the number of decisions coded so far.
    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    /// Returns the ideal cost, in bits, of the decisions coded so far.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the ideal cost in bytes, rounded up.
    pub fn cost_bytes(&self) -> usize {
        (self.cost / 8.0).ceil() as usize
    }
}

impl BitEncoder for EntropyEstimator {
    #[inline]
    fn encode_bit(&mut self, bit: bool, p0: Prob) {
        assert!(bit || p0 != 0, "A bit with zero probability cannot be encoded");
        let freq = if bit { K - p0 as u32 } else { p0 as u32 };
        self.decisions += 1;
        self.cost -= f64::log2(freq as f64 / K as f64);
    }
}
