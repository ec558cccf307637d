//! Pipeline analyzer that combines char filters, a tokenizer and token filters.
//!
//! # Architecture
//!
//! The PipelineAnalyzer applies processing in this order:
//! 1. Char Filters: Rewrite the raw text
//! 2. Tokenizer: Splits text into tokens
//! 3. Token Filters: Applied sequentially in the order they were added
//!
//! Token offsets always refer to the text passed to [`Analyzer::analyze`],
//! even when char filters changed its length.
//!
//! # Examples
//!
//! ```
//! use critique::analysis::analyzer::analyzer::Analyzer;
//! use critique::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use critique::analysis::char_filter::lowercase::LowercaseCharFilter;
//! use critique::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//! use critique::analysis::token_filter::stop::StopFilter;
//! use std::sync::Arc;
//!
//! let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
//!     .add_char_filter(Arc::new(LowercaseCharFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])))
//!     .with_name("my_custom_analyzer");
//!
//! let tokens: Vec<_> = analyzer.analyze("Great THE value AND fit").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "great");
//! assert_eq!(tokens[1].text, "value");
//! assert_eq!(tokens[2].text, "fit");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::char_filter::{CharFilter, Transformation};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with chains of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    char_filters: Vec<Arc<dyn CharFilter>>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            char_filters: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Add a char filter to the pipeline.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// The configured name of this analyzer.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the char filters used by this analyzer.
    pub fn char_filters(&self) -> &[Arc<dyn CharFilter>] {
        &self.char_filters
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Maps an offset in the filtered text back to the text before the filter ran.
    ///
    /// End offsets are exclusive: an end that touches a removed span stays in
    /// front of it, while a start at the same position moves past it.
    fn correct_offset(offset: usize, transformations: &[Transformation], is_end: bool) -> usize {
        let mut corrected = offset;
        // Transformations are ordered by position.
        for t in transformations {
            let original_len = t.original_end - t.original_start;
            let new_len = t.new_end - t.new_start;

            let past = if is_end {
                offset > t.new_end
            } else {
                offset >= t.new_end
            };
            let inside = if is_end {
                t.new_start < offset && offset <= t.new_end
            } else {
                t.new_start <= offset && offset < t.new_end
            };

            if past {
                corrected = (corrected as isize - new_len as isize + original_len as isize) as usize;
            } else if inside {
                // Only reachable when new_len > 0.
                let offset_in_new = offset - t.new_start;
                let scaled = offset_in_new * original_len;
                return t.original_start
                    + if is_end {
                        scaled.div_ceil(new_len)
                    } else {
                        scaled / new_len
                    };
            } else {
                break;
            }
        }
        corrected
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut filtered_text = text.to_string();
        let mut filter_transformations = Vec::with_capacity(self.char_filters.len());

        for char_filter in &self.char_filters {
            let (new_text, transformations) = char_filter.filter(&filtered_text);
            filtered_text = new_text;
            filter_transformations.push(transformations);
        }

        let mut tokens = self.tokenizer.tokenize(&filtered_text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        if filter_transformations.iter().all(|t| t.is_empty()) {
            return Ok(tokens);
        }

        // Map from the last char filter back to the caller's text.
        let collected: Vec<_> = tokens
            .map(|mut token| {
                for transformations in filter_transformations.iter().rev() {
                    token.start_offset =
                        Self::correct_offset(token.start_offset, transformations, false);
                    token.end_offset =
                        Self::correct_offset(token.end_offset, transformations, true);
                }
                token
            })
            .collect();
        Ok(Box::new(collected.into_iter()))
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "char_filters",
                &self
                    .char_filters
                    .iter()
                    .map(|f| f.name())
                    .collect::<Vec<_>>(),
            )
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
