//! Pipeline configuration.
//!
//! A [`PipelineConfig`] names the artifacts to load and the decision
//! settings. It can be read from a JSON file; every field is optional there
//! and falls back to the defaults below.
//!
//! ```
//! use critique::config::{DEFAULT_THRESHOLD, MAX_LEN, PipelineConfig};
//!
//! let config: PipelineConfig = serde_json::from_str(r#"{"model_path": "weights.bin"}"#).unwrap();
//! assert_eq!(config.model_path.to_str(), Some("weights.bin"));
//! assert_eq!(config.max_len, MAX_LEN);
//! assert_eq!(config.threshold, DEFAULT_THRESHOLD);
//! config.validate().unwrap();
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CritiqueError, Result};
use crate::pipeline::ConfidenceMode;

/// Sequence length the model was trained with.
pub const MAX_LEN: usize = 100;

/// Probabilities strictly above this value are Positive.
pub const DEFAULT_THRESHOLD: f32 = 0.5;

pub const DEFAULT_MODEL_PATH: &str = "sentiment_model.json";
pub const DEFAULT_VOCABULARY_PATH: &str = "tokenizer.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model weights, JSON or bincode.
    pub model_path: PathBuf,
    /// Vocabulary, Keras tokenizer JSON, plain JSON or bincode.
    pub vocabulary_path: PathBuf,
    /// Stopword list replacing the bundled English list.
    pub stopwords_path: Option<PathBuf>,
    pub max_len: usize,
    pub threshold: f32,
    pub confidence: ConfidenceMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            vocabulary_path: PathBuf::from(DEFAULT_VOCABULARY_PATH),
            stopwords_path: None,
            max_len: MAX_LEN,
            threshold: DEFAULT_THRESHOLD,
            confidence: ConfidenceMode::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CritiqueError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .map_err(|e| CritiqueError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;

        log::debug!("Loaded configuration from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 {
            return Err(CritiqueError::config("max_len must be positive"));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CritiqueError::config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
