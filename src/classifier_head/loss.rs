use ndarray::Array2;
use serde::{Deserialize, Serialize};

const EPSILON: f32 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loss {
    BinaryCrossentropy,
    CategoricalCrossentropy,
}

impl Loss {
    /// Two classes train against binary cross-entropy, more against categorical.
    pub fn for_classes(num_classes: usize) -> Self {
        if num_classes == 2 {
            Loss::BinaryCrossentropy
        } else {
            Loss::CategoricalCrossentropy
        }
    }

    /// Mean loss over the batch.
    pub fn value(&self, probs: &Array2<f32>, targets: &Array2<f32>) -> f32 {
        let n = probs.nrows().max(1) as f32;
        match self {
            Loss::CategoricalCrossentropy => {
                let total: f32 = probs
                    .iter()
                    .zip(targets.iter())
                    .map(|(p, y)| y * clip(*p).ln())
                    .sum();
                -total / n
            }
            Loss::BinaryCrossentropy => {
                let k = probs.ncols().max(1) as f32;
                let total: f32 = probs
                    .iter()
                    .zip(targets.iter())
                    .map(|(p, y)| {
                        let p = clip(*p);
                        y * p.ln() + (1.0 - y) * (1.0 - p).ln()
                    })
                    .sum();
                -total / (k * n)
            }
        }
    }

    /// Derivative of [`Loss::value`] with respect to each probability.
    pub fn gradient(&self, probs: &Array2<f32>, targets: &Array2<f32>) -> Array2<f32> {
        let n = probs.nrows().max(1) as f32;
        let mut grad = Array2::zeros(probs.raw_dim());
        match self {
            Loss::CategoricalCrossentropy => {
                ndarray::Zip::from(&mut grad)
                    .and(probs)
                    .and(targets)
                    .for_each(|g, &p, &y| *g = -y / clip(p) / n);
            }
            Loss::BinaryCrossentropy => {
                let k = probs.ncols().max(1) as f32;
                ndarray::Zip::from(&mut grad)
                    .and(probs)
                    .and(targets)
                    .for_each(|g, &p, &y| {
                        let p = clip(p);
                        *g = -(y / p - (1.0 - y) / (1.0 - p)) / (k * n);
                    });
            }
        }
        grad
    }
}

fn clip(p: f32) -> f32 {
    p.clamp(EPSILON, 1.0 - EPSILON)
}
