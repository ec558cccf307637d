use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::stem::StemFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Runs of characters erased by cleaning: anything but lowercase ASCII letters
/// and whitespace.
pub const NON_LETTER_PATTERN: &str = r"[^a-z\s]+";

/// The review cleaning the sentiment model was trained with.
///
/// Lowercases the text, erases every character that is not an ASCII letter
/// or whitespace, splits on whitespace, drops English stop words and reduces
/// the remaining words with the Porter stemmer.
pub struct ReviewAnalyzer {
    inner: PipelineAnalyzer,
}

impl ReviewAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Build the analyzer around a custom stopword list.
    pub fn with_stop_filter(stop_filter: StopFilter) -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::new(
                NON_LETTER_PATTERN,
                "",
            )?))
            .add_filter(Arc::new(stop_filter))
            .add_filter(Arc::new(StemFilter::new()))
            .with_name("review");

        Ok(Self { inner: analyzer })
    }

    /// Get the inner pipeline analyzer.
    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for ReviewAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "review"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl Debug for ReviewAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
