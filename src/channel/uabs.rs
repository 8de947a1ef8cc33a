//! A binary asymmetric numeral system (uABS) coder.
//!
//! The state `x` of the coder always lies in `[K, K << 16)`. Encoding a bit with probability `p`
//! grows the state by a factor of about `1/p`; before that, whole 16-bit words are shifted out of
//! the state so that it cannot overflow. Decoding is the exact algebraic inverse and shifts words
//! back in as soon as the state falls below `K`.
//!
//! # Note
//! Like every ANS, this coder is a stack: bits are decoded in the reverse of the order they were
//! encoded. The encoder writes its words from the end of its buffer backwards, so that the decoder
//! can read them forward starting from the flushed state.

use crate::channel::{BitDecoder, BitEncoder};
use crate::{CodecError, Prob, Result, K, K_LOG2};

/// How many bits are extracted/added from/to the state during renormalization.
const LOG2_B: u32 = 16;

/// Used to extract the 16 LSB from the state.
const NORMALIZATION_MASK: u32 = 0xFFFF;

/// The initial capacity of the buffer of the encoder.
const INITIAL_CAPACITY: usize = 1 << 10;

/// The encoding half of the uABS coder.
#[derive(Clone, Debug)]
pub struct UabsEncoder {
    state: u32,

    /// The backing buffer. Only `buffer[write_pos..]` contains written words.
    buffer: Vec<u8>,

    /// The index of the first byte written so far.
    write_pos: usize,
}

impl Default for UabsEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl UabsEncoder {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an encoder whose buffer can hold `capacity` bytes before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(4);
        Self {
            state: K,
            buffer: vec![0; capacity],
            write_pos: capacity,
        }
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len() - self.write_pos
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Doubles the capacity of the buffer, moving the written words to the end of the new one.
    fn grow(&mut self) {
        let old_len = self.buffer.len();
        let mut buffer = vec![0; old_len * 2];
        buffer[old_len + self.write_pos..].copy_from_slice(&self.buffer[self.write_pos..]);
        self.write_pos += old_len;
        self.buffer = buffer;
    }

    #[inline(always)]
    fn push_word(&mut self, word: u16) {
        if self.write_pos < 2 {
            self.grow();
        }
        self.write_pos -= 2;
        self.buffer[self.write_pos..self.write_pos + 2].copy_from_slice(&word.to_le_bytes());
    }

    fn shrink_state(&mut self) {
        self.push_word((self.state & NORMALIZATION_MASK) as u16);
        self.state >>= LOG2_B;
    }

    /// Flushes the final state as two words and returns the written bytes.
    ///
    /// The first four bytes of the result are the flushed state: a decoder must start there.
    pub fn finish(mut self) -> Vec<u8> {
        self.push_word(self.state as u16);
        self.push_word((self.state >> LOG2_B) as u16);
        self.buffer.split_off(self.write_pos)
    }
}

impl BitEncoder for UabsEncoder {
    #[inline]
    fn encode_bit(&mut self, bit: bool, p0: Prob) {
        assert!(p0 != 0, "uABS needs p0 strictly inside (0, K)");
        let q0 = K - p0 as u32;
        let freq = if bit { q0 } else { p0 as u32 };

        while self.state >= freq << LOG2_B {
            self.shrink_state();
        }

        let x = self.state as u64;
        self.state = if bit {
            (x << K_LOG2) / q0 as u64
        } else {
            (((x + 1) << K_LOG2) - 1) / p0 as u64
        } as u32;
    }
}

/// The decoding half of the uABS coder.
#[derive(Clone, Debug)]
pub struct UabsDecoder<'a> {
    state: u32,
    stream: &'a [u8],
    /// The index of the next byte of `stream` to be read.
    stream_pointer: usize,
}

impl<'a> UabsDecoder<'a> {
    /// Creates a decoder from a stream produced by [`UabsEncoder::finish`].
    pub fn new(stream: &'a [u8]) -> Result<Self> {
        Self::with_offset(stream, 0)
    }

    /// Creates a decoder from a stream produced by [`UabsEncoder::finish`] starting at `offset`.
    pub fn with_offset(stream: &'a [u8], offset: usize) -> Result<Self> {
        let mut decoder = Self {
            state: 0,
            stream,
            stream_pointer: offset,
        };
        decoder.extend_state()?;
        decoder.extend_state()?;
        Ok(decoder)
    }

    /// Returns the offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.stream_pointer
    }

    /// Returns whether the decoder is back to the initial state of the encoder, that is, whether
    /// every encoded bit has been decoded.
    pub fn is_exhausted(&self) -> bool {
        self.state == K
    }

    fn extend_state(&mut self) -> Result<()> {
        let end = self.stream_pointer + 2;
        let bytes = self
            .stream
            .get(self.stream_pointer..end)
            .ok_or(CodecError::TruncatedStream {
                offset: self.stream_pointer,
                needed: end - self.stream.len().max(self.stream_pointer),
            })?;
        self.stream_pointer = end;
        self.state = (self.state << LOG2_B) | u16::from_le_bytes([bytes[0], bytes[1]]) as u32;
        Ok(())
    }
}

impl BitDecoder for UabsDecoder<'_> {
    #[inline]
    fn decode_bit(&mut self, p0: Prob) -> Result<bool> {
        let q0 = (K - p0 as u32) as u64;
        let x = self.state as u64;
        // number of states in [0, x) and [0, x + 1) that encode a one
        let ones = (x * q0 + (K as u64 - 1)) >> K_LOG2;
        let ones_next = ((x + 1) * q0 + (K as u64 - 1)) >> K_LOG2;
        let bit = ones_next > ones;

        self.state = if bit { ones } else { x - ones } as u32;

        while self.state < K {
            self.extend_state()?;
        }
        Ok(bit)
    }
}
