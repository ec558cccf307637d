//! Layer definitions of a sequence model.

use serde::{Deserialize, Serialize};

use super::activation::Activation;
use super::lstm::{Bidirectional, Lstm, check_rows};
use super::tensor::{Shape, Tensor, affine};
use crate::error::{CritiqueError, Result};
use crate::sequence::TokenId;

/// Lookup table from token id to a dense vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// `[input_dim][output_dim]`; row `i` is the vector of token id `i`.
    pub weights: Vec<Vec<f32>>,
    /// Treat id `0` as padding and hide those timesteps from later layers.
    #[serde(default)]
    pub mask_zero: bool,
}

impl Embedding {
    /// Number of token ids the table covers.
    pub fn input_dim(&self) -> usize {
        self.weights.len()
    }

    pub fn output_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn output_shape(&self, steps: Option<usize>) -> Result<Shape> {
        if self.weights.is_empty() || self.output_dim() == 0 {
            return Err(CritiqueError::model_load("embedding table is empty"));
        }
        check_rows("embedding", &self.weights, self.output_dim())?;
        Ok(Shape::Sequence {
            steps,
            features: self.output_dim(),
        })
    }

    pub fn forward(&self, tokens: &[TokenId]) -> Result<Tensor> {
        let steps = tokens
            .iter()
            .map(|&id| {
                self.weights.get(id as usize).cloned().ok_or_else(|| {
                    CritiqueError::inference(format!(
                        "token id {id} is outside the embedding table of {} rows",
                        self.input_dim()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mask = self
            .mask_zero
            .then(|| tokens.iter().map(|&id| id != 0).collect());
        Ok(Tensor::Sequence { steps, mask })
    }
}

/// Fully connected layer. Applied to every timestep of a sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    /// `[input_dim][units]`.
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl Dense {
    pub fn units(&self) -> usize {
        self.bias.len()
    }

    pub fn output_shape(&self, input: Shape) -> Result<Shape> {
        if self.units() == 0 {
            return Err(CritiqueError::model_load("dense layer has no units"));
        }
        if self.kernel.len() != input.features() {
            return Err(CritiqueError::model_load(format!(
                "dense kernel has {} rows but the input has {} features",
                self.kernel.len(),
                input.features()
            )));
        }
        check_rows("dense kernel", &self.kernel, self.units())?;
        Ok(input.with_features(self.units()))
    }

    fn apply(&self, input: &[f32]) -> Vec<f32> {
        let mut output = affine(input, &self.kernel, &self.bias);
        self.activation.apply_slice(&mut output);
        output
    }

    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        Ok(match input {
            Tensor::Vector(values) => Tensor::Vector(self.apply(&values)),
            Tensor::Sequence { steps, mask } => Tensor::Sequence {
                steps: steps.iter().map(|step| self.apply(step)).collect(),
                mask,
            },
        })
    }
}

/// One layer of a [`SequenceModel`](super::sequence_model::SequenceModel).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Embedding(Embedding),
    Lstm(Lstm),
    Bidirectional(Bidirectional),
    Dense(Dense),
    /// Identity at inference time.
    Dropout { rate: f32 },
    /// Identity at inference time.
    #[serde(rename = "spatial_dropout1d")]
    SpatialDropout1d { rate: f32 },
    #[serde(rename = "global_max_pooling1d")]
    GlobalMaxPooling1d,
    #[serde(rename = "global_average_pooling1d")]
    GlobalAveragePooling1d,
    Flatten,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Embedding(_) => "embedding",
            Layer::Lstm(_) => "lstm",
            Layer::Bidirectional(_) => "bidirectional",
            Layer::Dense(_) => "dense",
            Layer::Dropout { .. } => "dropout",
            Layer::SpatialDropout1d { .. } => "spatial_dropout1d",
            Layer::GlobalMaxPooling1d => "global_max_pooling1d",
            Layer::GlobalAveragePooling1d => "global_average_pooling1d",
            Layer::Flatten => "flatten",
        }
    }

    /// Output shape for `input`, or an error if the weights do not fit it.
    pub fn output_shape(&self, input: Shape) -> Result<Shape> {
        match self {
            Layer::Embedding(_) => Err(CritiqueError::model_load(
                "embedding may only be the first layer",
            )),
            Layer::Lstm(lstm) => lstm.output_shape(input),
            Layer::Bidirectional(layer) => layer.output_shape(input),
            Layer::Dense(dense) => dense.output_shape(input),
            Layer::Dropout { .. } => Ok(input),
            Layer::SpatialDropout1d { .. } => match input {
                Shape::Sequence { .. } => Ok(input),
                Shape::Vector(_) => Err(CritiqueError::model_load(
                    "spatial_dropout1d expects a sequence input",
                )),
            },
            Layer::GlobalMaxPooling1d | Layer::GlobalAveragePooling1d => match input {
                Shape::Sequence { features, .. } => Ok(Shape::Vector(features)),
                Shape::Vector(_) => Err(CritiqueError::model_load(format!(
                    "{} expects a sequence input",
                    self.name()
                ))),
            },
            Layer::Flatten => match input {
                Shape::Sequence {
                    steps: Some(steps),
                    features,
                } => Ok(Shape::Vector(steps * features)),
                Shape::Sequence { steps: None, .. } => Err(CritiqueError::model_load(
                    "flatten needs a declared input_length",
                )),
                Shape::Vector(_) => Ok(input),
            },
        }
    }

    /// Evaluate the layer. Embeddings are evaluated by the model itself.
    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        match self {
            Layer::Embedding(_) => Err(CritiqueError::inference(
                "embedding may only be the first layer",
            )),
            Layer::Lstm(lstm) => lstm.forward(input),
            Layer::Bidirectional(layer) => layer.forward(input),
            Layer::Dense(dense) => dense.forward(input),
            Layer::Dropout { .. } | Layer::SpatialDropout1d { .. } => Ok(input),
            Layer::GlobalMaxPooling1d => {
                let (steps, mask) = input.into_sequence(self.name())?;
                Ok(Tensor::Vector(pool(&steps, mask.as_deref(), |values| {
                    values.fold(f32::NEG_INFINITY, f32::max)
                })))
            }
            Layer::GlobalAveragePooling1d => {
                let (steps, mask) = input.into_sequence(self.name())?;
                Ok(Tensor::Vector(pool(&steps, mask.as_deref(), |values| {
                    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
                    sum / count as f32
                })))
            }
            Layer::Flatten => match input {
                Tensor::Sequence { steps, .. } => Ok(Tensor::Vector(steps.concat())),
                vector => Ok(vector),
            },
        }
    }
}

/// Reduce every feature over the unmasked timesteps. A sequence with no
/// unmasked timestep pools to zeros.
fn pool<F>(steps: &[Vec<f32>], mask: Option<&[bool]>, reduce: F) -> Vec<f32>
where
    F: Fn(&mut dyn Iterator<Item = f32>) -> f32,
{
    let features = steps.first().map_or(0, Vec::len);
    let active: Vec<&Vec<f32>> = steps
        .iter()
        .enumerate()
        .filter(|(t, _)| mask.is_none_or(|mask| mask.get(*t).copied().unwrap_or(true)))
        .map(|(_, step)| step)
        .collect();

    if active.is_empty() {
        return vec![0.0; features];
    }

    (0..features)
        .map(|f| reduce(&mut active.iter().map(|step| step[f])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> Tensor {
        Tensor::Sequence {
            steps: vec![vec![1.0, -2.0], vec![3.0, 4.0], vec![100.0, 100.0]],
            mask: Some(vec![true, true, false]),
        }
    }

    #[test]
    fn test_embedding_lookup() {
        let embedding = Embedding {
            weights: vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![3.0, 4.0]],
            mask_zero: true,
        };
        assert_eq!(embedding.input_dim(), 3);

        let output = embedding.forward(&[0, 2, 1]).unwrap();
        assert_eq!(
            output,
            Tensor::Sequence {
                steps: vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![1.0, 2.0]],
                mask: Some(vec![false, true, true]),
            }
        );

        let err = embedding.forward(&[3]).unwrap_err();
        assert!(matches!(err, CritiqueError::Inference(_)));
    }

    #[test]
    fn test_dense_per_timestep() {
        let dense = Dense {
            kernel: vec![vec![1.0], vec![1.0]],
            bias: vec![0.5],
            activation: Activation::Linear,
        };
        let (steps, mask) = dense.forward(sequence()).unwrap().into_sequence("test").unwrap();
        assert_eq!(steps, vec![vec![-0.5], vec![7.5], vec![200.5]]);
        assert_eq!(mask, Some(vec![true, true, false]));
    }

    #[test]
    fn test_pooling_respects_mask() {
        let max = Layer::GlobalMaxPooling1d.forward(sequence()).unwrap();
        assert_eq!(max, Tensor::Vector(vec![3.0, 4.0]));

        let average = Layer::GlobalAveragePooling1d.forward(sequence()).unwrap();
        assert_eq!(average, Tensor::Vector(vec![2.0, 1.0]));

        let all_masked = Tensor::Sequence {
            steps: vec![vec![5.0]],
            mask: Some(vec![false]),
        };
        assert_eq!(
            Layer::GlobalMaxPooling1d.forward(all_masked).unwrap(),
            Tensor::Vector(vec![0.0])
        );
    }

    #[test]
    fn test_flatten() {
        let output = Layer::Flatten.forward(sequence()).unwrap();
        assert_eq!(output, Tensor::Vector(vec![1.0, -2.0, 3.0, 4.0, 100.0, 100.0]));

        let unknown = Shape::Sequence {
            steps: None,
            features: 2,
        };
        assert!(Layer::Flatten.output_shape(unknown).is_err());
        let known = Shape::Sequence {
            steps: Some(3),
            features: 2,
        };
        assert_eq!(Layer::Flatten.output_shape(known).unwrap(), Shape::Vector(6));
    }

    #[test]
    fn test_dropout_is_identity() {
        let layer = Layer::Dropout { rate: 0.5 };
        assert_eq!(layer.forward(sequence()).unwrap(), sequence());
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Layer::GlobalMaxPooling1d).unwrap();
        assert_eq!(json, "\"global_max_pooling1d\"");

        let layer: Layer = serde_json::from_str(r#"{"spatial_dropout1d": {"rate": 0.2}}"#).unwrap();
        assert_eq!(layer.name(), "spatial_dropout1d");

        let layer: Layer =
            serde_json::from_str(r#"{"dense": {"kernel": [[1.0]], "bias": [0.0]}}"#).unwrap();
        let Layer::Dense(dense) = layer else {
            panic!("expected a dense layer");
        };
        assert_eq!(dense.activation, Activation::Linear);
    }
}
