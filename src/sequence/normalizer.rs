use std::sync::Arc;

use super::padding::{Padding, Truncating, pad_sequence};
use super::vocabulary::Vocabulary;
use super::TokenId;
use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::review::ReviewAnalyzer;
use crate::analysis::token_filter::stop::StopFilter;
use crate::config::{MAX_LEN, PipelineConfig};
use crate::error::Result;

/// Deterministic review text to fixed-length id sequence transform.
///
/// The analyzer produces cleaned words, the vocabulary maps them to ids and
/// the result is pre-padded with zeros or pre-truncated to `max_len`.
///
/// ```
/// use std::sync::Arc;
/// use critique::analysis::analyzer::review::ReviewAnalyzer;
/// use critique::sequence::{Normalizer, Vocabulary};
///
/// let vocabulary = Vocabulary::from_json_str(r#"{"love": 1, "amaz": 2, "product": 3}"#).unwrap();
/// let normalizer = Normalizer::new(Arc::new(ReviewAnalyzer::new().unwrap()), Arc::new(vocabulary))
///     .with_max_len(5);
///
/// let ids = normalizer.normalize("This product is amazing, I love it!").unwrap();
/// assert_eq!(ids, vec![0, 0, 3, 2, 1]);
/// ```
#[derive(Clone)]
pub struct Normalizer {
    analyzer: Arc<dyn Analyzer>,
    vocabulary: Arc<Vocabulary>,
    max_len: usize,
}

impl Normalizer {
    pub fn new(analyzer: Arc<dyn Analyzer>, vocabulary: Arc<Vocabulary>) -> Self {
        Normalizer {
            analyzer,
            vocabulary,
            max_len: MAX_LEN,
        }
    }

    /// Build the review analyzer and load the vocabulary named by `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let stop_filter = match &config.stopwords_path {
            Some(path) => StopFilter::from_file(path)?,
            None => StopFilter::new(),
        };
        let analyzer = ReviewAnalyzer::with_stop_filter(stop_filter)?;
        let vocabulary = Vocabulary::from_file(&config.vocabulary_path)?;

        Ok(Self::new(Arc::new(analyzer), Arc::new(vocabulary)).with_max_len(config.max_len))
    }

    /// Set the sequence length. Must match the model's input length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// The cleaned, stopword-free, stemmed words of `text`.
    pub fn words(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }

    /// Transform `text` into exactly `max_len` token ids.
    pub fn normalize(&self, text: &str) -> Result<Vec<TokenId>> {
        let words = self.words(text)?;
        let ids = self.vocabulary.texts_to_sequence(&words);
        log::debug!(
            "normalized {} words into {} known ids (max_len {})",
            words.len(),
            ids.len(),
            self.max_len
        );
        Ok(pad_sequence(&ids, self.max_len, Padding::Pre, Truncating::Pre))
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    pub fn vocabulary(&self) -> &Arc<Vocabulary> {
        &self.vocabulary
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("analyzer", &self.analyzer.name())
            .field("vocabulary_len", &self.vocabulary.len())
            .field("max_len", &self.max_len)
            .finish()
    }
}
