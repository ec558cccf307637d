//! Char filter implementations for text normalization.
//!
//! Char filters pre-process the raw string before it reaches the tokenizer.
//! The review pipeline uses two of them, in this order:
//!
//! - [`lowercase::LowercaseCharFilter`] - Unicode lowercasing of the whole input
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based removal of
//!   everything that is not an ASCII letter or whitespace
//!
//! # Examples
//!
//! ```
//! use critique::analysis::char_filter::CharFilter;
//! use critique::analysis::char_filter::lowercase::LowercaseCharFilter;
//! use critique::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
//!
//! let lower = LowercaseCharFilter::new();
//! let strip = PatternReplaceCharFilter::new(r"[^a-z\s]", "").unwrap();
//!
//! let (text, _) = lower.filter("Great VALUE, 10/10!");
//! let (text, _) = strip.filter(&text);
//! assert_eq!(text, "great value ");
//! ```

/// Represents a change in the text, mapping a range in the original text
/// to a range in the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformation {
    pub original_start: usize,
    pub original_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

impl Transformation {
    pub fn new(
        original_start: usize,
        original_end: usize,
        new_start: usize,
        new_end: usize,
    ) -> Self {
        Self {
            original_start,
            original_end,
            new_start,
            new_end,
        }
    }
}

/// Trait for character filters that transform text before tokenization.
///
/// Implementations return the modified text along with the list of
/// length-changing transformations, ordered by position.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text.
    fn filter(&self, input: &str) -> (String, Vec<Transformation>);

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod pattern_replace;
