//! Token filter implementations for token transformation.
//!
//! Filters receive the stream produced by a tokenizer and return a new
//! stream, modifying or dropping tokens along the way.
//!
//! # Available Filters
//!
//! - [`stop::StopFilter`] - Removes stop words
//! - [`stem::StemFilter`] - Reduces words to their stem form
//!
//! # Examples
//!
//! ```
//! use critique::analysis::token_filter::Filter;
//! use critique::analysis::token_filter::stem::StemFilter;
//! use critique::analysis::token::Token;
//!
//! let filter = StemFilter::new();
//! let tokens = vec![Token::new("loved", 0), Token::new("products", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "love");
//! assert_eq!(filtered[1].text, "product");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
///
/// The trait requires `Send + Sync` so a built analyzer can be shared
/// across threads.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod stem;
pub mod stop;

pub use stem::{PorterStemmer, StemFilter, Stemmer};
pub use stop::StopFilter;
