//! Error types of the voxel codec.

use thiserror::Error;

/// Recoverable failures of an encode or decode pass.
///
/// Precondition violations (a probability outside `[0, K)`, a zero probability for an event
/// that occurs, an index outside the palette) are programmer errors and panic instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The header declares a format version this crate does not understand.
    #[error("unsupported header version {0}")]
    UnsupportedVersion(u8),

    /// The number of context bits is outside `1..=16`.
    #[error("invalid context bits {0}: must lie in 1..=16")]
    InvalidContextBits(u8),

    /// More causal neighbors than a context key can hold.
    #[error("too many neighbors: {0} (at most {max})", max = crate::codec::MAX_NEIGHBORS)]
    TooManyNeighbors(usize),

    /// A neighbor offset that references a voxel not yet coded in traversal order.
    #[error("neighbor offset ({0}, {1}, {2}) is not causal")]
    NonCausalNeighbor(i8, i8, i8),

    /// The palette does not fit the 16-bit precision of the integer coder.
    #[error("invalid palette size {0}: must lie in 1..=65536")]
    InvalidPaletteSize(usize),

    /// The stream ended before the decoder could renormalize.
    #[error("truncated stream: needed {needed} more bytes at offset {offset}")]
    TruncatedStream { offset: usize, needed: usize },

    /// The decoder finished the region without consuming the whole stream.
    #[error("corrupt stream: region decoded after {consumed} of {len} bytes")]
    UnconsumedStream { consumed: usize, len: usize },
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
