use mem_dbg::{MemDbg, MemSize};

use crate::channel::{BitDecoder, BitEncoder};
use crate::model::bit_model::{Adaptation, AdaptiveBitModel};
use crate::Result;

/// The number of exponent and mantissa levels, i.e., the bit width of the coded values.
pub const LEVELS: usize = 16;

/// The largest bound an integer coder accepts.
pub const MAX_BOUND: u32 = (1 << LEVELS) - 1;

/// The adaptation speeds of the models of a [`BoundedIntegerCoder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, MemDbg, MemSize)]
pub struct IntegerCoderConfig {
    /// The adaptation of the model deciding whether the value is zero.
    pub zero: Adaptation,
    /// The adaptation of the models deciding the exponent.
    pub exponent: Adaptation,
    /// The adaptation of the models deciding the mantissa bits.
    pub mantissa: Adaptation,
}

impl Default for IntegerCoderConfig {
    fn default() -> Self {
        Self {
            zero: Adaptation::SLOW,
            exponent: Adaptation::MEDIUM,
            mantissa: Adaptation::FAST,
        }
    }
}

/// A coder for integers known to lie in `[0, max]`, with `max` at most [`MAX_BOUND`].
///
/// A value is coded as a sequence of adaptive binary decisions:
/// 1. whether it is zero;
/// 2. if not, its exponent `e = ⌊log₂(value)⌋`, in unary, each step with its own model. The
///    exponent of `max` needs no terminating decision;
/// 3. the `e` bits below the leading one, from the most significant, each position with its own
///    model. Positions where a one would exceed `max` are forced to zero and cost nothing.
///
/// When `max` is zero nothing is coded at all.
#[derive(Clone, Debug, MemDbg, MemSize)]
pub struct BoundedIntegerCoder {
    zero: AdaptiveBitModel,
    exp: [AdaptiveBitModel; LEVELS],
    mant: [AdaptiveBitModel; LEVELS],
}

impl Default for BoundedIntegerCoder {
    fn default() -> Self {
        Self::new(IntegerCoderConfig::default())
    }
}

impl BoundedIntegerCoder {
    pub fn new(config: IntegerCoderConfig) -> Self {
        Self {
            zero: AdaptiveBitModel::new(config.zero),
            exp: [AdaptiveBitModel::new(config.exponent); LEVELS],
            mant: [AdaptiveBitModel::new(config.mantissa); LEVELS],
        }
    }

    /// Encodes `value`, known to lie in `[0, max]`.
    ///
    /// # Panics
    /// If `value > max` or `max > MAX_BOUND`.
    pub fn write(&mut self, channel: &mut impl BitEncoder, value: u32, max: u32) {
        assert!(max <= MAX_BOUND, "Bound {} exceeds {}", max, MAX_BOUND);
        assert!(value <= max, "Value {} exceeds its bound {}", value, max);

        if max == 0 {
            return;
        }

        self.zero.write(channel, value != 0);
        if value == 0 {
            return;
        }

        let e = value.ilog2() as usize;
        let emax = max.ilog2() as usize;

        for i in 0..emax {
            let hit = i == e;
            self.exp[i].write(channel, hit);
            if hit {
                break;
            }
        }

        let mut have = 1 << e;
        for pos in (0..e).rev() {
            let with_one = have | (1 << pos);
            if with_one > max {
                continue;
            }
            let bit = value & (1 << pos) != 0;
            self.mant[pos].write(channel, bit);
            if bit {
                have = with_one;
            }
        }
        debug_assert_eq!(have, value);
    }

    /// Decodes a value known to lie in `[0, max]`.
    ///
    /// # Panics
    /// If `max > MAX_BOUND`.
    pub fn read(&mut self, channel: &mut impl BitDecoder, max: u32) -> Result<u32> {
        assert!(max <= MAX_BOUND, "Bound {} exceeds {}", max, MAX_BOUND);

        if max == 0 || !self.zero.read(channel)? {
            return Ok(0);
        }

        let emax = max.ilog2() as usize;
        let mut e = emax;

        for i in 0..emax {
            if self.exp[i].read(channel)? {
                e = i;
                break;
            }
        }

        let mut have = 1 << e;
        for pos in (0..e).rev() {
            let with_one = have | (1 << pos);
            if with_one > max {
                continue;
            }
            if self.mant[pos].read(channel)? {
                have = with_one;
            }
        }
        Ok(have)
    }
}
