//! The review sentiment pipeline.
//!
//! [`SentimentPipeline`] composes the [`Normalizer`] and a [`Classifier`] and
//! applies the decision rule. Everything is loaded and cross-checked when the
//! pipeline is built, so a built pipeline can serve every input.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use critique::error::Result;
//! use critique::model::Classifier;
//! use critique::pipeline::{Label, SentimentPipeline};
//! use critique::sequence::{TokenId, Vocabulary};
//!
//! /// Positive whenever any known word is present.
//! struct AnyWord;
//!
//! impl Classifier for AnyWord {
//!     fn predict(&self, tokens: &[TokenId]) -> Result<f32> {
//!         Ok(if tokens.iter().any(|&id| id != 0) { 0.9 } else { 0.1 })
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "any_word"
//!     }
//! }
//!
//! let vocabulary = Vocabulary::from_json_str(r#"{"love": 1, "amaz": 2, "product": 3}"#).unwrap();
//! let pipeline = SentimentPipeline::builder()
//!     .vocabulary(Arc::new(vocabulary))
//!     .classifier(Arc::new(AnyWord))
//!     .build()
//!     .unwrap();
//!
//! let prediction = pipeline.analyze("This product is amazing, I love it!").unwrap();
//! assert_eq!(prediction.label, Label::Positive);
//! assert_eq!(prediction.confidence, 0.9);
//! ```

pub mod prediction;

pub use prediction::{ConfidenceMode, Label, Prediction};

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::review::ReviewAnalyzer;
use crate::config::{DEFAULT_THRESHOLD, MAX_LEN, PipelineConfig};
use crate::error::{CritiqueError, Result};
use crate::model::{Classifier, SequenceModel};
use crate::sequence::{Normalizer, TokenId, Vocabulary};

/// Raw review text in, [`Prediction`] out.
///
/// Cloning is cheap and clones share the loaded artifacts.
#[derive(Clone)]
pub struct SentimentPipeline {
    normalizer: Normalizer,
    classifier: Arc<dyn Classifier>,
    threshold: f32,
    confidence: ConfidenceMode,
}

impl SentimentPipeline {
    /// Create a new builder for SentimentPipeline.
    pub fn builder() -> SentimentPipelineBuilder {
        SentimentPipelineBuilder::new()
    }

    /// Load every artifact named by `config` and build the pipeline.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let normalizer = Normalizer::from_config(config)?;
        let model = SequenceModel::from_file(&config.model_path)?;

        Self::builder()
            .analyzer(normalizer.analyzer().clone())
            .vocabulary(normalizer.vocabulary().clone())
            .classifier(Arc::new(model))
            .max_len(config.max_len)
            .threshold(config.threshold)
            .confidence(config.confidence)
            .build()
    }

    /// Transform `text` into the fixed-length id sequence fed to the model.
    pub fn normalize(&self, text: &str) -> Result<Vec<TokenId>> {
        self.normalizer.normalize(text)
    }

    /// The analyzed words of `text`, before the vocabulary lookup.
    pub fn words(&self, text: &str) -> Result<Vec<String>> {
        self.normalizer.words(text)
    }

    /// Classify an already normalized sequence.
    pub fn predict(&self, tokens: &[TokenId]) -> Result<Prediction> {
        let probability = self.classifier.predict(tokens)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(CritiqueError::inference(format!(
                "{} returned {probability}, outside [0, 1]",
                self.classifier.name()
            )));
        }
        Ok(Prediction::from_probability(
            probability,
            self.threshold,
            self.confidence,
        ))
    }

    /// Classify a raw review.
    pub fn analyze(&self, text: &str) -> Result<Prediction> {
        let tokens = self.normalize(text)?;
        let prediction = self.predict(&tokens)?;
        log::debug!(
            "{} (p = {:.4}) for {} chars of input",
            prediction.label,
            prediction.probability,
            text.len()
        );
        Ok(prediction)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn confidence_mode(&self) -> ConfidenceMode {
        self.confidence
    }

    pub fn max_len(&self) -> usize {
        self.normalizer.max_len()
    }
}

impl std::fmt::Debug for SentimentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentPipeline")
            .field("normalizer", &self.normalizer)
            .field("classifier", &self.classifier.name())
            .field("threshold", &self.threshold)
            .field("confidence", &self.confidence)
            .finish()
    }
}

/// Builder for SentimentPipeline.
///
/// The vocabulary and classifier are required; the analyzer defaults to
/// [`ReviewAnalyzer`] with the bundled stopwords.
pub struct SentimentPipelineBuilder {
    analyzer: Option<Arc<dyn Analyzer>>,
    vocabulary: Option<Arc<Vocabulary>>,
    classifier: Option<Arc<dyn Classifier>>,
    max_len: usize,
    threshold: f32,
    confidence: ConfidenceMode,
}

impl SentimentPipelineBuilder {
    pub fn new() -> Self {
        SentimentPipelineBuilder {
            analyzer: None,
            vocabulary: None,
            classifier: None,
            max_len: MAX_LEN,
            threshold: DEFAULT_THRESHOLD,
            confidence: ConfidenceMode::default(),
        }
    }

    pub fn analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn vocabulary(mut self, vocabulary: Arc<Vocabulary>) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn confidence(mut self, confidence: ConfidenceMode) -> Self {
        self.confidence = confidence;
        self
    }

    /// Check that the parts fit together and build the pipeline.
    pub fn build(self) -> Result<SentimentPipeline> {
        let vocabulary = self
            .vocabulary
            .ok_or_else(|| CritiqueError::config("a vocabulary is required"))?;
        let classifier = self
            .classifier
            .ok_or_else(|| CritiqueError::config("a classifier is required"))?;
        let analyzer = match self.analyzer {
            Some(analyzer) => analyzer,
            None => Arc::new(ReviewAnalyzer::new()?),
        };

        if self.max_len == 0 {
            return Err(CritiqueError::config("max_len must be positive"));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CritiqueError::config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }

        if let Some(input_length) = classifier.input_length().filter(|&n| n != self.max_len) {
            return Err(CritiqueError::model_load(format!(
                "{} expects sequences of {input_length} tokens but max_len is {}",
                classifier.name(),
                self.max_len
            )));
        }

        if let Some(vocab_size) = classifier
            .vocab_size()
            .filter(|&size| vocabulary.max_index() as usize >= size)
        {
            return Err(CritiqueError::model_load(format!(
                "vocabulary emits ids up to {} but {} only accepts ids below {vocab_size}",
                vocabulary.max_index(),
                classifier.name()
            )));
        }

        if vocabulary.is_empty() {
            log::warn!("The vocabulary is empty; every review will normalize to padding");
        }

        log::info!(
            "Sentiment pipeline ready: {} analyzer, {} words, {} classifier, max_len {}, threshold {}",
            analyzer.name(),
            vocabulary.len(),
            classifier.name(),
            self.max_len,
            self.threshold
        );

        Ok(SentimentPipeline {
            normalizer: Normalizer::new(analyzer, vocabulary).with_max_len(self.max_len),
            classifier,
            threshold: self.threshold,
            confidence: self.confidence,
        })
    }
}

impl Default for SentimentPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activation, Dense, Embedding, Layer, ModelArtifact};

    struct Constant(f32);

    impl Classifier for Constant {
        fn predict(&self, _tokens: &[TokenId]) -> Result<f32> {
            Ok(self.0)
        }

        fn name(&self) -> &'static str {
            "constant"
        }
    }

    fn vocabulary() -> Arc<Vocabulary> {
        Arc::new(Vocabulary::from_json_str(r#"{"love": 1, "amaz": 2, "product": 3}"#).unwrap())
    }

    fn flatten_model(input_length: usize, vocab_size: usize) -> SequenceModel {
        SequenceModel::new(ModelArtifact {
            name: None,
            input_length: Some(input_length),
            layers: vec![
                Layer::Embedding(Embedding {
                    weights: vec![vec![0.0]; vocab_size],
                    mask_zero: false,
                }),
                Layer::Flatten,
                Layer::Dense(Dense {
                    kernel: vec![vec![0.0]; input_length],
                    bias: vec![0.0],
                    activation: Activation::Sigmoid,
                }),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_missing_parts() {
        let err = SentimentPipeline::builder()
            .classifier(Arc::new(Constant(0.5)))
            .build()
            .unwrap_err();
        assert!(matches!(err, CritiqueError::Config(_)));

        let err = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .build()
            .unwrap_err();
        assert!(matches!(err, CritiqueError::Config(_)));
    }

    #[test]
    fn test_input_length_must_match() {
        let err = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(flatten_model(50, 4)))
            .build()
            .unwrap_err();
        assert!(matches!(err, CritiqueError::ModelLoad(_)));

        let pipeline = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(flatten_model(50, 4)))
            .max_len(50)
            .build()
            .unwrap();
        assert_eq!(pipeline.max_len(), 50);
        assert_eq!(pipeline.analyze("").unwrap().probability, 0.5);
    }

    #[test]
    fn test_vocabulary_must_fit_embedding() {
        let err = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(flatten_model(MAX_LEN, 3)))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("only accepts ids below 3"));
    }

    #[test]
    fn test_invalid_settings() {
        let err = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(Constant(0.5)))
            .threshold(2.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CritiqueError::Config(_)));

        let err = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(Constant(0.5)))
            .max_len(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, CritiqueError::Config(_)));
    }

    #[test]
    fn test_out_of_range_probability() {
        let pipeline = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(Constant(1.5)))
            .build()
            .unwrap();
        assert!(matches!(
            pipeline.analyze("love").unwrap_err(),
            CritiqueError::Inference(_)
        ));
    }

    #[test]
    fn test_threshold_and_confidence() {
        let pipeline = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(Constant(0.6)))
            .threshold(0.7)
            .confidence(ConfidenceMode::Raw)
            .build()
            .unwrap();

        let prediction = pipeline.analyze("love it").unwrap();
        assert_eq!(prediction.label, Label::Negative);
        assert_eq!(prediction.confidence, 0.6);
        assert_eq!(pipeline.threshold(), 0.7);
        assert_eq!(pipeline.confidence_mode(), ConfidenceMode::Raw);
    }

    #[test]
    fn test_decisive_confidence_with_raised_threshold() {
        let pipeline = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(Constant(0.6)))
            .threshold(0.7)
            .build()
            .unwrap();

        let prediction = pipeline.analyze("love it").unwrap();
        assert_eq!(prediction.label, Label::Negative);
        assert!((prediction.confidence - 0.4).abs() < 1e-6);
        assert_eq!(prediction.probability, 0.6);
    }

    #[test]
    fn test_shared_across_threads() {
        let pipeline = SentimentPipeline::builder()
            .vocabulary(vocabulary())
            .classifier(Arc::new(Constant(0.8)))
            .build()
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pipeline = pipeline.clone();
                std::thread::spawn(move || pipeline.analyze("amazing product").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().label, Label::Positive);
        }
    }
}
