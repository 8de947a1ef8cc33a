//! Binary entropy-coding channels.
//!
//! A channel codes one bit at a time given `p0`, the probability of the bit being zero scaled by
//! [`K`](crate::K). Two backends are provided:
//! - a carry-less [range coder](range_coder), which decodes bits in the same order they are encoded;
//! - a [uABS](uabs) coder, which decodes bits in the reverse of the order they are encoded. Use a
//!   [`ReversedEncoder`](reverse::ReversedEncoder) to feed it in decode order.

pub mod estimator;
pub mod range_coder;
pub mod reverse;
pub mod uabs;

use std::fmt::Display;

use crate::{Prob, Result};

/// Encoding half of a binary channel.
pub trait BitEncoder {
    /// Encodes `bit`, whose probability of being zero is `p0 / K`.
    ///
    /// # Panics
    /// If `p0` is not valid for the backend, or if `bit` is zero and `p0` is zero.
    fn encode_bit(&mut self, bit: bool, p0: Prob);
}

/// Decoding half of a binary channel.
pub trait BitDecoder {
    /// Decodes a bit whose probability of being zero is `p0 / K`.
    ///
    /// `p0` must be the same value the encoder was given for this bit.
    fn decode_bit(&mut self, p0: Prob) -> Result<bool>;
}

impl<E: BitEncoder + ?Sized> BitEncoder for &mut E {
    #[inline(always)]
    fn encode_bit(&mut self, bit: bool, p0: Prob) {
        (**self).encode_bit(bit, p0)
    }
}

impl<D: BitDecoder + ?Sized> BitDecoder for &mut D {
    #[inline(always)]
    fn decode_bit(&mut self, p0: Prob) -> Result<bool> {
        (**self).decode_bit(p0)
    }
}

/// An enumeration of the available entropy-coding backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// The carry-less range coder.
    Range,
    /// The uABS coder.
    Uabs,
}

impl Backend {
    /// The tag identifying the backend in a stored region.
    pub fn tag(self) -> u8 {
        match self {
            Backend::Range => 0,
            Backend::Uabs => 1,
        }
    }
}

impl TryFrom<u8> for Backend {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> anyhow::Result<Self> {
        match value {
            0 => Ok(Self::Range),
            1 => Ok(Self::Uabs),
            _ => anyhow::bail!("Invalid backend tag {}", value),
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Range => write!(f, "range"),
            Backend::Uabs => write!(f, "uabs"),
        }
    }
}
