//! Turning analyzed words into the fixed-length integer sequences the model
//! consumes.
//!
//! - [`vocabulary::Vocabulary`] - The pretrained `word -> index` table
//! - [`padding`] - Pre/post padding and truncation to a fixed length
//! - [`normalizer::Normalizer`] - Analyzer + vocabulary + padding in one call

pub mod normalizer;
pub mod padding;
pub mod vocabulary;

pub use normalizer::Normalizer;
pub use padding::{PADDING_VALUE, Padding, Truncating, pad_sequence};
pub use vocabulary::{Vocabulary, VocabularyArtifact};

/// Index of a word in the vocabulary. `0` is reserved for padding.
pub type TokenId = u32;
