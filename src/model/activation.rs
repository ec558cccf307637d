//! Element-wise activation functions.

use serde::{Deserialize, Serialize};

/// Activation applied to a layer's pre-activation values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Sigmoid,
    /// Piecewise linear sigmoid approximation: `clamp(0.2 * x + 0.5, 0, 1)`.
    HardSigmoid,
    Tanh,
    Relu,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::HardSigmoid => (0.2 * x + 0.5).clamp(0.0, 1.0),
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
        }
    }

    /// Apply the activation in place.
    pub fn apply_slice(self, values: &mut [f32]) {
        if self == Activation::Linear {
            return;
        }
        for value in values {
            *value = self.apply(*value);
        }
    }

    /// Whether every output lies in `[0, 1]`.
    pub fn is_probability(self) -> bool {
        matches!(self, Activation::Sigmoid | Activation::HardSigmoid)
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Sigmoid => "sigmoid",
            Activation::HardSigmoid => "hard_sigmoid",
            Activation::Tanh => "tanh",
            Activation::Relu => "relu",
        }
    }
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn tanh() -> Activation {
    Activation::Tanh
}

pub(crate) fn sigmoid() -> Activation {
    Activation::Sigmoid
}
