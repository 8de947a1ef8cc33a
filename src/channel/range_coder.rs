//! A carry-less binary range coder.
//!
//! The coder keeps an interval `[low, high]` of 32-bit values. Every bit splits the interval
//! proportionally to its probability. Whenever the top 16 bits of `low` and `high` agree they can
//! no longer change, so they are streamed out as a big-endian 16-bit word. Since the interval is
//! always kept non-empty and the emitted word is the shared prefix, no carry ever propagates into
//! bytes already written.

use crate::channel::{BitDecoder, BitEncoder};
use crate::{CodecError, Prob, Result, K_LOG2};

/// Mask selecting the top 16 bits of the interval bounds.
const TOP_MASK: u32 = 0xFFFF_0000;

/// How many bits are shifted out of the interval bounds at each renormalization.
const WORD_BITS: u32 = 16;

#[inline(always)]
fn split(low: u32, high: u32, p0: Prob) -> u32 {
    low + (((high - low) as u64 * p0 as u64) >> K_LOG2) as u32
}

/// The encoding half of the range coder.
#[derive(Clone, Debug)]
pub struct RangeEncoder {
    low: u32,
    high: u32,
    /// The words streamed out so far, big endian.
    stream: Vec<u8>,
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeEncoder {
    pub fn new() -> Self {
        Self::with_buffer(Vec::new())
    }

    /// Creates an encoder appending its words to `stream`.
    ///
    /// Bytes already in `stream` (e.g., a header) are left untouched.
    pub fn with_buffer(stream: Vec<u8>) -> Self {
        Self {
            low: 0,
            high: u32::MAX,
            stream,
        }
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.stream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    #[inline(always)]
    fn push_word(&mut self, word: u16) {
        self.stream.extend_from_slice(&word.to_be_bytes());
    }

    /// Flushes the current upper bound as two words and returns the stream.
    pub fn finish(mut self) -> Vec<u8> {
        self.push_word((self.high >> WORD_BITS) as u16);
        self.push_word(self.high as u16);
        self.stream
    }
}

impl BitEncoder for RangeEncoder {
    #[inline]
    fn encode_bit(&mut self, bit: bool, p0: Prob) {
        assert!(bit || p0 != 0, "A bit with zero probability cannot be encoded");
        debug_assert!(self.low <= self.high);

        let mid = split(self.low, self.high, p0);

        if bit {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }

        while (self.low ^ self.high) & TOP_MASK == 0 {
            self.push_word((self.high >> WORD_BITS) as u16);
            self.low <<= WORD_BITS;
            self.high = (self.high << WORD_BITS) | 0xFFFF;
        }
    }
}

/// The decoding half of the range coder.
#[derive(Clone, Debug)]
pub struct RangeDecoder<'a> {
    low: u32,
    high: u32,
    code: u32,
    stream: &'a [u8],
    /// The index of the next byte of `stream` to be read.
    stream_pointer: usize,
}

impl<'a> RangeDecoder<'a> {
    /// Creates a decoder reading the stream starting at the beginning of `stream`.
    pub fn new(stream: &'a [u8]) -> Result<Self> {
        Self::with_offset(stream, 0)
    }

    /// Creates a decoder reading the stream starting at `offset`.
    pub fn with_offset(stream: &'a [u8], offset: usize) -> Result<Self> {
        let mut decoder = Self {
            low: 0,
            high: u32::MAX,
            code: 0,
            stream,
            stream_pointer: offset,
        };
        let hi = decoder.read_word()?;
        let lo = decoder.read_word()?;
        decoder.code = (hi as u32) << WORD_BITS | lo as u32;
        Ok(decoder)
    }

    /// Returns the offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.stream_pointer
    }

    fn read_word(&mut self) -> Result<u16> {
        let end = self.stream_pointer + 2;
        let bytes = self
            .stream
            .get(self.stream_pointer..end)
            .ok_or(CodecError::TruncatedStream {
                offset: self.stream_pointer,
                needed: end - self.stream.len().max(self.stream_pointer),
            })?;
        self.stream_pointer = end;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}

impl BitDecoder for RangeDecoder<'_> {
    #[inline]
    fn decode_bit(&mut self, p0: Prob) -> Result<bool> {
        let mid = split(self.low, self.high, p0);
        let bit = self.code > mid;

        if bit {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }

        while (self.low ^ self.high) & TOP_MASK == 0 {
            self.low <<= WORD_BITS;
            self.high = (self.high << WORD_BITS) | 0xFFFF;
            self.code = (self.code << WORD_BITS) | self.read_word()? as u32;
        }
        Ok(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream_is_the_flushed_bound() {
        let stream = RangeEncoder::new().finish();
        assert_eq!(stream, vec![0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_header_bytes_are_preserved() {
        let mut encoder = RangeEncoder::with_buffer(vec![7, 8, 9]);
        encoder.encode_bit(true, 1 << 15);
        encoder.encode_bit(false, 1 << 15);
        let stream = encoder.finish();
        assert_eq!(&stream[..3], &[7, 8, 9]);

        let mut decoder = RangeDecoder::with_offset(&stream, 3).unwrap();
        assert!(decoder.decode_bit(1 << 15).unwrap());
        assert!(!decoder.decode_bit(1 << 15).unwrap());
    }

    #[test]
    fn test_certain_bits_emit_words() {
        let mut encoder = RangeEncoder::new();
        // almost certain zeros shrink the interval very slowly
        for _ in 0..64 {
            encoder.encode_bit(false, u16::MAX);
        }
        let stream = encoder.finish();
        let mut decoder = RangeDecoder::new(&stream).unwrap();
        for _ in 0..64 {
            assert!(!decoder.decode_bit(u16::MAX).unwrap());
        }
        assert_eq!(decoder.position(), stream.len());
    }

    #[test]
    #[should_panic]
    fn test_zero_probability_zero_bit_panics() {
        let mut encoder = RangeEncoder::new();
        encoder.encode_bit(false, 0);
    }

    #[test]
    fn test_truncated_stream() {
        let mut encoder = RangeEncoder::new();
        for i in 0..1000 {
            encoder.encode_bit(i % 3 == 0, 1 << 15);
        }
        let stream = encoder.finish();
        let truncated = &stream[..stream.len() / 2];
        let mut decoder = RangeDecoder::new(truncated).unwrap();
        let result = (0..1000).try_for_each(|_| decoder.decode_bit(1 << 15).map(|_| ()));
        assert!(matches!(result, Err(CodecError::TruncatedStream { .. })));
        assert!(matches!(
            RangeDecoder::new(&stream[..3]),
            Err(CodecError::TruncatedStream { offset: 2, needed: 1 })
        ));
    }
}
