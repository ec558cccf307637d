//! Stemming token filter and stemmer implementations.

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

pub mod porter;

pub use porter::PorterStemmer;

/// Filter that applies stemming to tokens.
pub struct StemFilter {
    /// The stemmer to use.
    stemmer: Box<dyn Stemmer>,
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a new stem filter with the Porter stemmer.
    pub fn new() -> Self {
        StemFilter {
            stemmer: Box::new(PorterStemmer::new()),
        }
    }

    /// Create a stem filter with a custom stemmer.
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let stemmed = self.stemmer.stem(&token.text);
                    token.with_text(stemmed)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    struct TruncatingStemmer;

    impl Stemmer for TruncatingStemmer {
        fn stem(&self, word: &str) -> String {
            word.chars().take(4).collect()
        }

        fn name(&self) -> &'static str {
            "truncating"
        }
    }

    #[test]
    fn test_stem_filter() {
        let filter = StemFilter::new();
        let tokens = vec![
            Token::new("running", 0),
            Token::new("flies", 1),
            Token::new("test", 2).stop(),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "run");
        assert_eq!(result[0].original(), "running");
        assert_eq!(result[1].text, "fli");
        assert_eq!(result[2].text, "test"); // Stopped tokens are not processed
        assert!(result[2].is_stopped());
    }

    #[test]
    fn test_custom_stemmer() {
        let filter = StemFilter::with_stemmer(Box::new(TruncatingStemmer));
        let tokens = vec![Token::new("beautiful", 0)];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
        assert_eq!(result[0].text, "beau");
        assert_eq!(format!("{filter:?}"), "StemFilter { stemmer: \"truncating\" }");
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StemFilter::new().name(), "stem");
    }
}
