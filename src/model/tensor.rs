//! Values and shapes flowing between layers.

use crate::error::{CritiqueError, Result};

/// The activations produced by a layer for one input sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Tensor {
    /// One feature vector per timestep, with an optional padding mask
    /// (`true` for timesteps that carry a real token).
    Sequence {
        steps: Vec<Vec<f32>>,
        mask: Option<Vec<bool>>,
    },
    /// A single feature vector.
    Vector(Vec<f32>),
}

impl Tensor {
    pub fn sequence(steps: Vec<Vec<f32>>) -> Self {
        Tensor::Sequence { steps, mask: None }
    }

    pub fn into_sequence(self, layer: &str) -> Result<(Vec<Vec<f32>>, Option<Vec<bool>>)> {
        match self {
            Tensor::Sequence { steps, mask } => Ok((steps, mask)),
            Tensor::Vector(_) => Err(CritiqueError::inference(format!(
                "{layer} expects a sequence input"
            ))),
        }
    }

    pub fn into_vector(self, layer: &str) -> Result<Vec<f32>> {
        match self {
            Tensor::Vector(values) => Ok(values),
            Tensor::Sequence { .. } => Err(CritiqueError::inference(format!(
                "{layer} expects a vector input"
            ))),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Tensor::Sequence { steps, .. } => Shape::Sequence {
                steps: Some(steps.len()),
                features: steps.first().map_or(0, Vec::len),
            },
            Tensor::Vector(values) => Shape::Vector(values.len()),
        }
    }
}

/// Static shape of a layer output, checked when a model is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// `steps` is known only when the model declares an input length.
    Sequence {
        steps: Option<usize>,
        features: usize,
    },
    Vector(usize),
}

impl Shape {
    /// Number of features per timestep or vector length.
    pub fn features(&self) -> usize {
        match self {
            Shape::Sequence { features, .. } => *features,
            Shape::Vector(size) => *size,
        }
    }

    pub fn with_features(&self, features: usize) -> Shape {
        match self {
            Shape::Sequence { steps, .. } => Shape::Sequence {
                steps: *steps,
                features,
            },
            Shape::Vector(_) => Shape::Vector(features),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Sequence {
                steps: Some(steps),
                features,
            } => write!(f, "({steps}, {features})"),
            Shape::Sequence {
                steps: None,
                features,
            } => write!(f, "(None, {features})"),
            Shape::Vector(size) => write!(f, "({size})"),
        }
    }
}

/// `bias + input · weights` for a row-major `[input][output]` weight matrix.
pub(crate) fn affine(input: &[f32], weights: &[Vec<f32>], bias: &[f32]) -> Vec<f32> {
    let mut output = bias.to_vec();
    accumulate(&mut output, input, weights);
    output
}

/// `output += input · weights`.
pub(crate) fn accumulate(output: &mut [f32], input: &[f32], weights: &[Vec<f32>]) {
    for (&x, row) in input.iter().zip(weights) {
        if x == 0.0 {
            continue;
        }
        for (out, &w) in output.iter_mut().zip(row) {
            *out += x * w;
        }
    }
}
