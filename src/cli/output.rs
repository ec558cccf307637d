//! Output formatting for CLI commands.

use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{CritiqueArgs, OutputFormat};
use crate::error::Result;
use crate::pipeline::{Label, Prediction};
use crate::sequence::TokenId;

const BAR_WIDTH: usize = 20;

/// Result structure for review classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub review: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Review", self.prediction.label)?;
        writeln!(f, "Confidence: {:.2}", self.prediction.confidence)?;
        write!(f, "{}", confidence_bar(&self.prediction, BAR_WIDTH))
    }
}

/// Result structure for review normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub review: String,
    pub words: Option<Vec<String>>,
    pub tokens: Vec<TokenId>,
}

impl NormalizationResult {
    /// Ids that are not padding.
    pub fn known_tokens(&self) -> usize {
        self.tokens.iter().filter(|&&id| id != 0).count()
    }
}

impl fmt::Display for NormalizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(words) = &self.words {
            writeln!(f, "Words: {}", words.join(" "))?;
        }
        writeln!(
            f,
            "Tokens ({} known of {}):",
            self.known_tokens(),
            self.tokens.len()
        )?;
        let tokens: Vec<String> = self.tokens.iter().map(|id| id.to_string()).collect();
        write!(f, "{}", tokens.join(" "))
    }
}

/// Share of the bar filled for a prediction: the probability for positive
/// reviews, its complement for negative ones.
pub fn confidence_bar(prediction: &Prediction, width: usize) -> String {
    let progress = match prediction.label {
        Label::Positive => prediction.probability,
        Label::Negative => 1.0 - prediction.probability,
    };
    let filled = ((progress.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &CritiqueArgs) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)
}

/// Write a result in the specified format.
pub fn write_result<W, T>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &CritiqueArgs,
) -> Result<()>
where
    W: Write,
    T: Serialize + fmt::Display,
{
    match args.output_format {
        OutputFormat::Human => write_human(out, message, result, args),
        OutputFormat::Json => write_json(out, result, args),
    }
}

/// Output in human-readable format.
fn write_human<W: Write, T: fmt::Display>(
    out: &mut W,
    message: &str,
    result: &T,
    args: &CritiqueArgs,
) -> Result<()> {
    if args.verbosity() > 0 {
        writeln!(out, "{message}")?;
    }
    writeln!(out, "{result}")?;
    if args.verbosity() > 0 {
        writeln!(out)?;
    }
    Ok(())
}

/// Output in JSON format, one document per line unless pretty-printed.
fn write_json<W: Write, T: Serialize>(out: &mut W, result: &T, args: &CritiqueArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}
