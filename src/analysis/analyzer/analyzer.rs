//! Core analyzer trait definition.
//!
//! This module defines the [`Analyzer`] trait, the seam between raw review
//! text and the vocabulary lookup performed by the normalizer.
//!
//! # Role in Analysis Pipeline
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Filter 1 … Filter N → Token Stream
//! ```
//!
//! # Available Implementations
//!
//! - [`PipelineAnalyzer`](super::pipeline::PipelineAnalyzer) - Custom char filter, tokenizer and filter chains
//! - [`ReviewAnalyzer`](super::review::ReviewAnalyzer) - The cleaning used when the model was trained
//!
//! # Examples
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use critique::analysis::analyzer::analyzer::Analyzer;
//! use critique::analysis::token::{Token, TokenStream};
//! use critique::error::Result;
//!
//! struct ShoutingAnalyzer;
//!
//! impl Analyzer for ShoutingAnalyzer {
//!     fn analyze(&self, text: &str) -> Result<TokenStream> {
//!         let tokens: Vec<Token> = text
//!             .split_whitespace()
//!             .enumerate()
//!             .map(|(i, w)| Token::new(w.to_uppercase(), i))
//!             .collect();
//!         Ok(Box::new(tokens.into_iter()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "shouting"
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! let tokens: Vec<_> = ShoutingAnalyzer.analyze("so good").unwrap().collect();
//! assert_eq!(tokens[1].text, "GOOD");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// # Thread Safety
///
/// The trait requires `Send + Sync` so that one analyzer can serve every
/// request of a shared pipeline.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use critique::analysis::analyzer::analyzer::Analyzer;
    /// use critique::analysis::analyzer::review::ReviewAnalyzer;
    ///
    /// let analyzer = ReviewAnalyzer::new().unwrap();
    /// let tokens: Vec<_> = analyzer.analyze("The delivery was fast").unwrap().collect();
    ///
    /// // "the" and "was" are stop words
    /// assert_eq!(tokens.len(), 2);
    /// assert_eq!(tokens[0].text, "deliveri");
    /// ```
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn std::any::Any;
}
