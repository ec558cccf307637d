//! Command line argument parsing for the critique CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::ConfidenceMode;

/// critique - Product review sentiment classification
#[derive(Parser, Debug, Clone)]
#[command(name = "critique")]
#[command(about = "Classify product reviews as positive or negative")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Critique Contributors")]
#[command(long_about = None)]
pub struct CritiqueArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "CRITIQUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model weights (JSON or bincode)
    #[arg(long, value_name = "MODEL_FILE", env = "CRITIQUE_MODEL")]
    pub model: Option<PathBuf>,

    /// Vocabulary (Keras tokenizer JSON, plain JSON or bincode)
    #[arg(long, value_name = "VOCAB_FILE", env = "CRITIQUE_VOCAB")]
    pub vocab: Option<PathBuf>,

    /// Stopword list, one word per line
    #[arg(long, value_name = "STOPWORDS_FILE")]
    pub stopwords: Option<PathBuf>,

    /// Probability above which a review is positive
    #[arg(long)]
    pub threshold: Option<f32>,

    /// How the reported confidence is derived
    #[arg(long)]
    pub confidence: Option<ConfidenceArg>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CritiqueArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// The configuration file (or defaults) with command line overrides applied.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        if let Some(vocab) = &self.vocab {
            config.vocabulary_path = vocab.clone();
        }
        if let Some(stopwords) = &self.stopwords {
            config.stopwords_path = Some(stopwords.clone());
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(confidence) = self.confidence {
            config.confidence = confidence.into();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Classify a review, or every non-blank line of standard input
    Analyze(AnalyzeArgs),

    /// Show the token sequence a review is turned into
    Normalize(NormalizeArgs),

    /// Classify the built-in example reviews
    Examples,

    /// Start an interactive review session
    Interactive,
}

/// Arguments for classifying reviews
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Review text (reads standard input when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

/// Arguments for normalizing a review
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Review text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Also show the analyzed words
    #[arg(long)]
    pub words: bool,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Confidence modes selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceArg {
    /// Confidence in the reported label
    Decisive,
    /// Positive-class probability
    Raw,
}

impl From<ConfidenceArg> for ConfidenceMode {
    fn from(arg: ConfidenceArg) -> Self {
        match arg {
            ConfidenceArg::Decisive => ConfidenceMode::Decisive,
            ConfidenceArg::Raw => ConfidenceMode::Raw,
        }
    }
}
