//! # Critique
//!
//! Product review sentiment classification with a pretrained sequence model.
//!
//! ## Features
//!
//! - Deterministic text normalization (lowercasing, letter filtering,
//!   stopword removal, Porter stemming)
//! - Keras-compatible vocabulary lookup and sequence padding
//! - Native evaluation of exported embedding / LSTM / dense weights
//! - Thread-safe pipeline shared behind `Arc`
//! - Command line front end with an interactive session

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod sequence;
pub mod session;

pub mod prelude {
    pub use crate::analysis::{Analyzer, PipelineAnalyzer, ReviewAnalyzer};
    pub use crate::config::{DEFAULT_THRESHOLD, MAX_LEN, PipelineConfig};
    pub use crate::error::{CritiqueError, Result};
    pub use crate::model::{Classifier, SequenceModel};
    pub use crate::pipeline::{ConfidenceMode, Label, Prediction, SentimentPipeline};
    pub use crate::sequence::{Normalizer, TokenId, Vocabulary};
    pub use crate::session::{HistoryEntry, SessionHistory};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
