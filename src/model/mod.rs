//! Adaptive statistical models driving the binary channels.
//!
//! From the leaves up: an [`AdaptiveBitModel`](bit_model::AdaptiveBitModel) estimates a single
//! binary decision, a [`BoundedIntegerCoder`](integer_coder::BoundedIntegerCoder) chains them to
//! code integers in a known range, and a [`ContextBucket`](context_bucket::ContextBucket) uses an
//! integer coder to code block ids as positions in a self-organizing palette.

pub mod bit_model;
pub mod context_bucket;
pub mod integer_coder;
