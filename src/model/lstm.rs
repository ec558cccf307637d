//! Long short-term memory layers.
//!
//! Weights follow the Keras layout: `kernel` is `[input_dim][4 * units]`,
//! `recurrent_kernel` is `[units][4 * units]` and `bias` is `[4 * units]`,
//! with the four gate blocks ordered input, forget, cell, output. The initial
//! hidden and cell states are zero.

use serde::{Deserialize, Serialize};

use super::activation::{self, Activation};
use super::tensor::{Shape, Tensor, accumulate, affine};
use crate::error::{CritiqueError, Result};

const GATES: usize = 4;

/// A unidirectional LSTM layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lstm {
    pub units: usize,
    pub kernel: Vec<Vec<f32>>,
    pub recurrent_kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default = "activation::tanh")]
    pub activation: Activation,
    #[serde(default = "activation::sigmoid")]
    pub recurrent_activation: Activation,
    /// Emit the hidden state of every timestep instead of only the last one.
    #[serde(default)]
    pub return_sequences: bool,
}

impl Lstm {
    pub fn input_dim(&self) -> usize {
        self.kernel.len()
    }

    /// Check the weights against `input` and return the output shape.
    pub fn output_shape(&self, input: Shape) -> Result<Shape> {
        let Shape::Sequence { steps, features } = input else {
            return Err(CritiqueError::model_load(format!(
                "lstm expects a sequence input, got {input}"
            )));
        };

        let width = GATES * self.units;
        if self.units == 0 {
            return Err(CritiqueError::model_load("lstm must have at least one unit"));
        }
        if self.kernel.len() != features {
            return Err(CritiqueError::model_load(format!(
                "lstm kernel has {} rows but the input has {features} features",
                self.kernel.len()
            )));
        }
        check_rows("lstm kernel", &self.kernel, width)?;
        if self.recurrent_kernel.len() != self.units {
            return Err(CritiqueError::model_load(format!(
                "lstm recurrent kernel has {} rows, expected {}",
                self.recurrent_kernel.len(),
                self.units
            )));
        }
        check_rows("lstm recurrent kernel", &self.recurrent_kernel, width)?;
        if self.bias.len() != width {
            return Err(CritiqueError::model_load(format!(
                "lstm bias has {} values, expected {width}",
                self.bias.len()
            )));
        }

        Ok(if self.return_sequences {
            Shape::Sequence {
                steps,
                features: self.units,
            }
        } else {
            Shape::Vector(self.units)
        })
    }

    /// Advance one timestep from state `(h, c)`.
    pub fn step(&self, x: &[f32], h: &[f32], c: &[f32]) -> (Vec<f32>, Vec<f32>) {
        let units = self.units;
        let mut z = affine(x, &self.kernel, &self.bias);
        accumulate(&mut z, h, &self.recurrent_kernel);

        let (input_gate, rest) = z.split_at_mut(units);
        let (forget_gate, rest) = rest.split_at_mut(units);
        let (candidate, output_gate) = rest.split_at_mut(units);
        self.recurrent_activation.apply_slice(input_gate);
        self.recurrent_activation.apply_slice(forget_gate);
        self.activation.apply_slice(candidate);
        self.recurrent_activation.apply_slice(output_gate);

        let mut next_c = Vec::with_capacity(units);
        let mut next_h = Vec::with_capacity(units);
        for u in 0..units {
            let cell = forget_gate[u] * c[u] + input_gate[u] * candidate[u];
            next_c.push(cell);
            next_h.push(output_gate[u] * self.activation.apply(cell));
        }
        (next_h, next_c)
    }

    /// Hidden state after every timestep. Masked timesteps carry the previous
    /// state forward unchanged.
    pub fn run(&self, steps: &[Vec<f32>], mask: Option<&[bool]>) -> Vec<Vec<f32>> {
        let mut h = vec![0.0; self.units];
        let mut c = vec![0.0; self.units];
        let mut outputs = Vec::with_capacity(steps.len());

        for (t, x) in steps.iter().enumerate() {
            let active = mask.is_none_or(|mask| mask.get(t).copied().unwrap_or(true));
            if active {
                (h, c) = self.step(x, &h, &c);
            }
            outputs.push(h.clone());
        }
        outputs
    }

    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        let (steps, mask) = input.into_sequence("lstm")?;
        let outputs = self.run(&steps, mask.as_deref());

        if self.return_sequences {
            Ok(Tensor::Sequence {
                steps: outputs,
                mask,
            })
        } else {
            Ok(Tensor::Vector(
                outputs.last().cloned().unwrap_or_else(|| vec![0.0; self.units]),
            ))
        }
    }
}

/// Runs one LSTM over the sequence and another over its reverse, then
/// concatenates their outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bidirectional {
    pub forward: Lstm,
    pub backward: Lstm,
}

impl Bidirectional {
    pub fn output_shape(&self, input: Shape) -> Result<Shape> {
        if self.forward.return_sequences != self.backward.return_sequences {
            return Err(CritiqueError::model_load(
                "bidirectional layers must agree on return_sequences",
            ));
        }
        let forward = self.forward.output_shape(input)?;
        let backward = self.backward.output_shape(input)?;
        Ok(forward.with_features(forward.features() + backward.features()))
    }

    pub fn forward(&self, input: Tensor) -> Result<Tensor> {
        let (steps, mask) = input.into_sequence("bidirectional")?;

        let forward = self.forward.run(&steps, mask.as_deref());

        let reversed: Vec<Vec<f32>> = steps.iter().rev().cloned().collect();
        let reversed_mask: Option<Vec<bool>> =
            mask.as_ref().map(|mask| mask.iter().rev().copied().collect());
        let mut backward = self.backward.run(&reversed, reversed_mask.as_deref());

        if self.forward.return_sequences {
            backward.reverse();
            let merged = forward
                .into_iter()
                .zip(backward)
                .map(|(mut f, b)| {
                    f.extend(b);
                    f
                })
                .collect();
            Ok(Tensor::Sequence {
                steps: merged,
                mask,
            })
        } else {
            let mut merged = forward
                .last()
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.forward.units]);
            merged.extend(
                backward
                    .last()
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.backward.units]),
            );
            Ok(Tensor::Vector(merged))
        }
    }
}

pub(crate) fn check_rows(what: &str, matrix: &[Vec<f32>], width: usize) -> Result<()> {
    if let Some((row, values)) = matrix
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != width)
    {
        return Err(CritiqueError::model_load(format!(
            "{what} row {row} has {} values, expected {width}",
            values.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One input feature, one unit, every gate weight 1 and no recurrence.
    fn single_unit(recurrent: f32) -> Lstm {
        Lstm {
            units: 1,
            kernel: vec![vec![1.0, 1.0, 1.0, 1.0]],
            recurrent_kernel: vec![vec![recurrent; 4]],
            bias: vec![0.0; 4],
            activation: Activation::Tanh,
            recurrent_activation: Activation::Sigmoid,
            return_sequences: false,
        }
    }

    #[test]
    fn test_single_step() {
        let lstm = single_unit(0.0);
        let (h, c) = lstm.step(&[1.0], &[0.0], &[0.0]);
        // c = sigmoid(1) * tanh(1), h = sigmoid(1) * tanh(c)
        assert!((c[0] - 0.556_769_9).abs() < 1e-5);
        assert!((h[0] - 0.369_606_4).abs() < 1e-5);
    }

    #[test]
    fn test_two_steps_with_recurrence() {
        let lstm = single_unit(0.5);
        let output = lstm
            .forward(Tensor::sequence(vec![vec![1.0], vec![1.0]]))
            .unwrap();
        let Tensor::Vector(h) = output else {
            panic!("expected a vector");
        };
        assert_eq!(h.len(), 1);
        assert!((h[0] - 0.602_022_8).abs() < 1e-5);
    }

    #[test]
    fn test_gate_order() {
        // Only the forget gate sees the input; with zero input and cell gates
        // the state stays zero.
        let lstm = Lstm {
            kernel: vec![vec![0.0, 5.0, 0.0, 0.0]],
            ..single_unit(0.0)
        };
        let (h, c) = lstm.step(&[1.0], &[0.0], &[0.0]);
        assert_eq!(c[0], 0.0);
        assert_eq!(h[0], 0.0);
    }

    #[test]
    fn test_masked_steps_carry_state() {
        let lstm = Lstm {
            return_sequences: true,
            ..single_unit(0.0)
        };
        let output = lstm
            .forward(Tensor::Sequence {
                steps: vec![vec![1.0], vec![1.0], vec![1.0]],
                mask: Some(vec![false, true, false]),
            })
            .unwrap();
        let (steps, mask) = output.into_sequence("test").unwrap();
        assert_eq!(steps[0], vec![0.0]);
        assert!((steps[1][0] - 0.369_606_4).abs() < 1e-5);
        assert_eq!(steps[2], steps[1]);
        assert_eq!(mask, Some(vec![false, true, false]));
    }

    #[test]
    fn test_bidirectional_concat() {
        let layer = Bidirectional {
            forward: single_unit(0.0),
            backward: single_unit(0.0),
        };
        let input = Shape::Sequence {
            steps: Some(2),
            features: 1,
        };
        assert_eq!(layer.output_shape(input).unwrap(), Shape::Vector(2));

        // Only the last timestep is non-zero: the forward pass ends on it,
        // the backward pass sees it first and then a zero step.
        let output = layer
            .forward(Tensor::sequence(vec![vec![0.0], vec![1.0]]))
            .unwrap()
            .into_vector("test")
            .unwrap();
        assert!((output[0] - 0.369_606_4).abs() < 1e-5);
        assert!((output[1] - 0.135_704_8).abs() < 1e-5);
    }

    #[test]
    fn test_shape_validation() {
        let lstm = single_unit(0.0);
        let input = Shape::Sequence {
            steps: None,
            features: 2,
        };
        assert!(lstm.output_shape(input).is_err());
        assert!(lstm.output_shape(Shape::Vector(1)).is_err());

        let bad_bias = Lstm {
            bias: vec![0.0; 3],
            ..single_unit(0.0)
        };
        let input = Shape::Sequence {
            steps: None,
            features: 1,
        };
        assert!(bad_bias.output_shape(input).is_err());
        assert_eq!(lstm.output_shape(input).unwrap(), Shape::Vector(1));
    }

    #[test]
    fn test_keras_defaults() {
        let lstm: Lstm = serde_json::from_str(
            r#"{"units": 1, "kernel": [[0, 0, 0, 0]], "recurrent_kernel": [[0, 0, 0, 0]], "bias": [0, 0, 0, 0]}"#,
        )
        .unwrap();
        assert_eq!(lstm.activation, Activation::Tanh);
        assert_eq!(lstm.recurrent_activation, Activation::Sigmoid);
        assert!(!lstm.return_sequences);
    }
}
