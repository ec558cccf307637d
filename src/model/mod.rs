//! Pretrained sentiment classifiers.
//!
//! A [`Classifier`] maps a fixed-length token id sequence to the probability
//! that the review is positive. [`SequenceModel`] is the shipped
//! implementation: an embedding followed by recurrent, pooling and dense
//! layers, evaluated natively from exported weights.

pub mod activation;
pub mod layers;
pub mod lstm;
pub mod sequence_model;
pub mod tensor;

pub use activation::Activation;
pub use layers::{Dense, Embedding, Layer};
pub use lstm::{Bidirectional, Lstm};
pub use sequence_model::{ModelArtifact, SequenceModel};

use crate::error::Result;
use crate::sequence::TokenId;

/// Trait for binary sentiment classifiers.
///
/// Implementations must be deterministic for a fixed set of weights and
/// return a value in `[0, 1]`.
pub trait Classifier: Send + Sync {
    /// Probability that the sequence encodes a positive review.
    fn predict(&self, tokens: &[TokenId]) -> Result<f32>;

    /// Sequence length the classifier requires, if fixed.
    fn input_length(&self) -> Option<usize> {
        None
    }

    /// Number of token ids the classifier accepts (ids `0..vocab_size`).
    fn vocab_size(&self) -> Option<usize> {
        None
    }

    /// Get the name of this classifier (for debugging and logging).
    fn name(&self) -> &'static str;
}
