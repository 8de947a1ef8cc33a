use crate::channel::BitEncoder;
use crate::Prob;

/// A [`BitEncoder`] that records every coded bit and replays them, last to first, into another
/// encoder when flushed.
///
/// This is how a stack-like backend such as [`UabsEncoder`](crate::channel::uabs::UabsEncoder)
/// is driven by adaptive models: the models see the bits in decode order, while the backend
/// receives them in the reverse order it needs.
///
/// Every decision is held in memory until [`flush`](Self::flush), at four bytes each: a full
/// region of 32×32 chunks and 384 layers, at a few decisions per voxel, buffers over a gigabyte.
/// Use [`with_capacity`](Self::with_capacity) to reserve the expected number of decisions up
/// front.
#[derive(Clone, Debug)]
pub struct ReversedEncoder<E: BitEncoder> {
    inner: E,
    bits: Vec<(bool, Prob)>,
}

impl<E: BitEncoder> ReversedEncoder<E> {
    pub fn new(inner: E) -> Self {
        Self::with_capacity(inner, 0)
    }

    /// Creates an encoder that can record `capacity` bits before reallocating.
    pub fn with_capacity(inner: E, capacity: usize) -> Self {
        Self {
            inner,
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bits that can be recorded before reallocating.
    pub fn capacity(&self) -> usize {
        self.bits.capacity()
    }

    /// Returns the number of bits recorded so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Feeds the recorded bits, in reverse order, to the inner encoder and returns it.
    pub fn flush(mut self) -> E {
        for &(bit, p0) in self.bits.iter().rev() {
            self.inner.encode_bit(bit, p0);
        }
        self.inner
    }
}

impl<E: BitEncoder> BitEncoder for ReversedEncoder<E> {
    #[inline(always)]
    fn encode_bit(&mut self, bit: bool, p0: Prob) {
        assert!(bit || p0 != 0, "A bit with zero probability cannot be encoded");
        self.bits.push((bit, p0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::uabs::{UabsDecoder, UabsEncoder};
    use crate::channel::BitDecoder;

    #[test]
    fn test_reversed_uabs_decodes_in_encoding_order() {
        let bits = [(true, 100), (false, 40_000), (true, 3), (false, 65_000), (true, 20_000)];
        let mut encoder = ReversedEncoder::new(UabsEncoder::new());
        for &(bit, p0) in bits.iter() {
            encoder.encode_bit(bit, p0);
        }
        assert_eq!(encoder.len(), bits.len());
        let stream = encoder.flush().finish();

        let mut decoder = UabsDecoder::new(&stream).unwrap();
        for &(bit, p0) in bits.iter() {
            assert_eq!(decoder.decode_bit(p0).unwrap(), bit);
        }
        assert!(decoder.is_exhausted());
    }

    #[test]
    fn test_reserved_capacity_holds_without_growing() {
        let mut encoder = ReversedEncoder::with_capacity(UabsEncoder::new(), 1000);
        let capacity = encoder.capacity();
        assert!(capacity >= 1000);
        for i in 0..1000 {
            encoder.encode_bit(i % 5 == 0, 50_000);
        }
        assert_eq!(encoder.len(), 1000);
        assert_eq!(encoder.capacity(), capacity);

        let stream = encoder.flush().finish();
        let mut decoder = UabsDecoder::new(&stream).unwrap();
        for i in 0..1000 {
            assert_eq!(decoder.decode_bit(50_000).unwrap(), i % 5 == 0);
        }
        assert!(decoder.is_exhausted());
    }
}
