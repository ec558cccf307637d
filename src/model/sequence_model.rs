//! A pretrained stack of layers evaluated natively.
//!
//! The model is exported as a [`ModelArtifact`]: an ordered list of layers
//! with their weights, stored as JSON (`.json`) or bincode (any other
//! extension). The stack must start with an [`Embedding`] and end with a
//! single-unit [`Dense`](super::layers::Dense) layer whose activation keeps
//! the output inside `[0, 1]`.
//!
//! # Examples
//!
//! ```
//! use critique::model::{Classifier, SequenceModel};
//!
//! let model = SequenceModel::from_json_str(r#"{
//!     "input_length": 3,
//!     "layers": [
//!         {"embedding": {"weights": [[0.0], [1.0], [-1.0]]}},
//!         "flatten",
//!         {"dense": {"kernel": [[0.0], [0.0], [2.0]], "bias": [0.0], "activation": "sigmoid"}}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(model.predict(&[0, 0, 0]).unwrap(), 0.5);
//! assert!(model.predict(&[0, 0, 1]).unwrap() > 0.5);
//! assert!(model.predict(&[0, 0, 2]).unwrap() < 0.5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Classifier;
use super::layers::{Embedding, Layer};
use super::tensor::{Shape, Tensor};
use crate::error::{CritiqueError, Result};
use crate::sequence::TokenId;

/// Serialized form of a [`SequenceModel`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Free-form model name used in logs.
    #[serde(default)]
    pub name: Option<String>,
    /// Sequence length the model was trained on, if fixed.
    #[serde(default)]
    pub input_length: Option<usize>,
    pub layers: Vec<Layer>,
}

/// Binary sentiment classifier built from a validated [`ModelArtifact`].
#[derive(Clone, Debug)]
pub struct SequenceModel {
    name: String,
    input_length: Option<usize>,
    embedding: Embedding,
    layers: Vec<Layer>,
}

impl SequenceModel {
    /// Validate an artifact and build the model.
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        let mut layers = artifact.layers.into_iter();
        let embedding = match layers.next() {
            Some(Layer::Embedding(embedding)) => embedding,
            Some(other) => {
                return Err(CritiqueError::model_load(format!(
                    "the first layer must be an embedding, found {}",
                    other.name()
                )));
            }
            None => return Err(CritiqueError::model_load("the model has no layers")),
        };
        let layers: Vec<Layer> = layers.collect();

        if artifact.input_length == Some(0) {
            return Err(CritiqueError::model_load("input_length must be positive"));
        }

        let mut shape = embedding
            .output_shape(artifact.input_length)
            .map_err(|e| Self::layer_error(0, "embedding", e))?;
        for (idx, layer) in layers.iter().enumerate() {
            shape = layer
                .output_shape(shape)
                .map_err(|e| Self::layer_error(idx + 1, layer.name(), e))?;
        }

        match layers.last() {
            Some(Layer::Dense(dense)) if shape == Shape::Vector(1) => {
                if !dense.activation.is_probability() {
                    return Err(CritiqueError::model_load(format!(
                        "the output layer must use a sigmoid activation, found {}",
                        dense.activation
                    )));
                }
            }
            _ => {
                return Err(CritiqueError::model_load(format!(
                    "the model must end in a single-unit dense layer producing one value, \
                     but its output shape is {shape}"
                )));
            }
        }

        let name = artifact.name.unwrap_or_else(|| "sequence_model".to_string());
        log::debug!(
            "Validated model {name}: {} layers after the {}x{} embedding",
            layers.len(),
            embedding.input_dim(),
            embedding.output_dim()
        );

        Ok(SequenceModel {
            name,
            input_length: artifact.input_length,
            embedding,
            layers,
        })
    }

    fn layer_error(idx: usize, name: &str, error: CritiqueError) -> CritiqueError {
        match error {
            CritiqueError::ModelLoad(msg) => {
                CritiqueError::model_load(format!("layer {idx} ({name}): {msg}"))
            }
            other => other,
        }
    }

    /// Load a model file, choosing the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            CritiqueError::model_load(format!("failed to read model {}: {e}", path.display()))
        })?;

        let model = if is_json(path) {
            let text = String::from_utf8(bytes).map_err(|e| {
                CritiqueError::model_load(format!("{}: model is not UTF-8: {e}", path.display()))
            })?;
            Self::from_json_str(&text)
        } else {
            Self::from_bincode(&bytes)
        }
        .map_err(|e| match e {
            CritiqueError::ModelLoad(msg) => {
                CritiqueError::model_load(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        log::info!(
            "Loaded model {} ({} layers, vocabulary of {}) from {}",
            model.name,
            model.layers.len() + 1,
            model.embedding.input_dim(),
            path.display()
        );
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| CritiqueError::model_load(format!("malformed model JSON: {e}")))?;
        Self::new(artifact)
    }

    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = bincode::deserialize(bytes)
            .map_err(|e| CritiqueError::model_load(format!("malformed model artifact: {e}")))?;
        Self::new(artifact)
    }

    /// The serialized form of this model.
    pub fn to_artifact(&self) -> ModelArtifact {
        let mut layers = Vec::with_capacity(self.layers.len() + 1);
        layers.push(Layer::Embedding(self.embedding.clone()));
        layers.extend(self.layers.iter().cloned());
        ModelArtifact {
            name: Some(self.name.clone()),
            input_length: self.input_length,
            layers,
        }
    }

    /// Save the model, choosing the format from the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let artifact = self.to_artifact();
        let bytes = if is_json(path) {
            serde_json::to_vec(&artifact)?
        } else {
            bincode::serialize(&artifact)
                .map_err(|e| CritiqueError::other(format!("failed to encode model: {e}")))?
        };
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn model_name(&self) -> &str {
        &self.name
    }

    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Layers after the embedding.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl Classifier for SequenceModel {
    fn predict(&self, tokens: &[TokenId]) -> Result<f32> {
        if tokens.is_empty() {
            return Err(CritiqueError::inference("cannot classify an empty sequence"));
        }
        if let Some(expected) = self.input_length.filter(|&n| n != tokens.len()) {
            return Err(CritiqueError::inference(format!(
                "expected a sequence of {expected} tokens, got {}",
                tokens.len()
            )));
        }

        let mut tensor: Tensor = self.embedding.forward(tokens)?;
        for layer in &self.layers {
            tensor = layer.forward(tensor)?;
        }

        let output = tensor.into_vector("output")?;
        match output.as_slice() {
            [probability] if probability.is_finite() => Ok(*probability),
            [other] => Err(CritiqueError::inference(format!(
                "model produced a non-finite output {other}"
            ))),
            other => Err(CritiqueError::inference(format!(
                "model produced {} outputs instead of one",
                other.len()
            ))),
        }
    }

    fn input_length(&self) -> Option<usize> {
        self.input_length
    }

    fn vocab_size(&self) -> Option<usize> {
        Some(self.embedding.input_dim())
    }

    fn name(&self) -> &'static str {
        "sequence_model"
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
