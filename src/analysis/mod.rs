//! Text analysis module for critique.
//!
//! This module turns a raw review into the list of cleaned word tokens the
//! vocabulary understands. Analysis is built from three kinds of stages:
//! char filters rewrite the raw string, a tokenizer splits it into tokens and
//! token filters drop or rewrite individual tokens.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
