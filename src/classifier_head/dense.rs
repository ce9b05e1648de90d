use ndarray::{Array1, Array2, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fully connected layer: `y = x . W + b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    pub weights: Array2<f32>,
    pub bias: Array1<f32>,
}

impl Dense {
    /// Glorot-uniform weights, zero bias.
    pub fn glorot<R: Rng>(inputs: usize, units: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (inputs + units) as f32).sqrt();
        Self {
            weights: Array2::from_shape_fn((inputs, units), |_| rng.random_range(-limit..limit)),
            bias: Array1::zeros(units),
        }
    }

    pub fn forward(&self, inputs: &ArrayView2<f32>) -> Array2<f32> {
        inputs.dot(&self.weights) + &self.bias
    }

    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn units(&self) -> usize {
        self.weights.ncols()
    }
}

#[derive(Debug, Clone)]
pub struct DenseGradients {
    pub weights: Array2<f32>,
    pub bias: Array1<f32>,
}
