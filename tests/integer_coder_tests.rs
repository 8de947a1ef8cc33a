mod common;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use voxel_entropy::channel::estimator::EntropyEstimator;
use voxel_entropy::channel::Backend;
use voxel_entropy::model::integer_coder::{BoundedIntegerCoder, MAX_BOUND};

use crate::common::*;

/// Every value up to every small bound, then random values under some large bounds.
fn get_bounded_values() -> Vec<(u32, u32)> {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut values = (0..=300_u32)
        .flat_map(|max| (0..=max).map(move |value| (value, max)))
        .collect::<Vec<_>>();

    for max in [511, 512, 1000, 1023, 1024, 4095, 40_000, MAX_BOUND] {
        values.extend([(0, max), (1, max), (max - 1, max), (max, max)]);
        values.extend((0..1000).map(|_| (rng.gen_range(0..=max), max)));
    }
    values
}

#[rstest]
fn coder_decodes_every_bounded_value(#[values(Backend::Range, Backend::Uabs)] backend: Backend) {
    let values = get_bounded_values();

    let stream = encode_with(backend, |mut channel| {
        let mut coder = BoundedIntegerCoder::default();
        values
            .iter()
            .for_each(|&(value, max)| coder.write(&mut channel, value, max));
    });
    let decoded = decode_with(backend, &stream, |mut channel| {
        let mut coder = BoundedIntegerCoder::default();
        values
            .iter()
            .map(|&(_, max)| coder.read(&mut channel, max).unwrap())
            .collect::<Vec<_>>()
    });

    assert!(values.iter().map(|&(value, _)| value).eq(decoded));
}

#[test]
fn coder_learns_a_skewed_source() {
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut coder = BoundedIntegerCoder::default();
    let mut estimator = EntropyEstimator::default();

    // mostly zeros, with the occasional value among the first few
    for _ in 0..100_000 {
        let value = if rng.gen_ratio(9, 10) { 0 } else { rng.gen_range(1..4) };
        coder.write(&mut estimator, value, 299);
    }

    // the source has about 0.63 bits of entropy per value
    let bits_per_value = estimator.cost() / 100_000.0;
    assert!(bits_per_value < 0.8, "{} bits per value", bits_per_value);
}

#[test]
fn bound_of_a_power_of_two_skips_its_mantissa() {
    let mut coder = BoundedIntegerCoder::default();
    let mut estimator = EntropyEstimator::default();

    // zero flag and ten exponent decisions: no bit below the leading one can be set
    coder.write(&mut estimator, 1024, 1024);
    assert_eq!(estimator.decisions(), 1 + 10);

    // zero flag, ten exponent decisions and nine mantissa decisions
    coder.write(&mut estimator, 1023, 1024);
    assert_eq!(estimator.decisions(), 11 + 1 + 10 + 9);
}
