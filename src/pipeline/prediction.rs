//! Turning a model probability into a labelled prediction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentiment class of a review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Positive iff `probability` is strictly above `threshold`.
    pub fn from_probability(probability: f32, threshold: f32) -> Self {
        if probability > threshold {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "Positive",
            Label::Negative => "Negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the reported confidence is derived from the model probability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Probability mass behind the reported label: `p` when positive,
    /// `1 - p` when negative.
    #[default]
    Decisive,
    /// The positive-class probability, whatever the label.
    Raw,
}

impl ConfidenceMode {
    pub fn confidence(&self, probability: f32, label: Label) -> f32 {
        match (self, label) {
            (ConfidenceMode::Decisive, Label::Positive) => probability,
            (ConfidenceMode::Decisive, Label::Negative) => 1.0 - probability,
            (ConfidenceMode::Raw, _) => probability,
        }
    }
}

/// The outcome of classifying one review.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Confidence in `[0, 1]`, derived according to the [`ConfidenceMode`].
    pub confidence: f32,
    /// Raw model output: probability of the positive class.
    pub probability: f32,
}

impl Prediction {
    /// Apply the decision rule to a model probability.
    ///
    /// ```
    /// use critique::pipeline::{ConfidenceMode, Label, Prediction};
    ///
    /// let prediction = Prediction::from_probability(0.2, 0.5, ConfidenceMode::Decisive);
    /// assert_eq!(prediction.label, Label::Negative);
    /// assert!((prediction.confidence - 0.8).abs() < 1e-6);
    /// assert_eq!(prediction.probability, 0.2);
    /// ```
    pub fn from_probability(probability: f32, threshold: f32, mode: ConfidenceMode) -> Self {
        let label = Label::from_probability(probability, threshold);
        Prediction {
            label,
            confidence: mode.confidence(probability, label),
            probability,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.label == Label::Positive
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (confidence {:.2})", self.label, self.confidence)
    }
}
