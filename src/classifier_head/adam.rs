use crate::classifier_head::dense::{Dense, DenseGradients};
use ndarray::{Array, Dimension, Zip};

const BETA1: f32 = 0.9;
const BETA2: f32 = 0.999;
const EPSILON: f32 = 1e-7;

#[derive(Debug, Clone)]
struct Moments<D: Dimension> {
    m: Array<f32, D>,
    v: Array<f32, D>,
}

impl<D: Dimension> Moments<D> {
    fn zeros_like(param: &Array<f32, D>) -> Self {
        Self {
            m: Array::zeros(param.raw_dim()),
            v: Array::zeros(param.raw_dim()),
        }
    }

    fn apply(&mut self, param: &mut Array<f32, D>, grad: &Array<f32, D>, lr: f32, step: i32) {
        let m_correction = 1.0 - BETA1.powi(step);
        let v_correction = 1.0 - BETA2.powi(step);
        Zip::from(param)
            .and(&mut self.m)
            .and(&mut self.v)
            .and(grad)
            .for_each(|p, m, v, &g| {
                *m = BETA1 * *m + (1.0 - BETA1) * g;
                *v = BETA2 * *v + (1.0 - BETA2) * g * g;
                let m_hat = *m / m_correction;
                let v_hat = *v / v_correction;
                *p -= lr * m_hat / (v_hat.sqrt() + EPSILON);
            });
    }
}

#[derive(Debug, Clone)]
struct LayerMoments {
    weights: Moments<ndarray::Ix2>,
    bias: Moments<ndarray::Ix1>,
}

/// Adam with per-layer first and second moment estimates. State survives
/// across `fit` calls, so retraining continues where the last run stopped.
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f32,
    step: i32,
    layers: Vec<LayerMoments>,
}

impl Adam {
    pub fn new(learning_rate: f32, layers: &[&Dense]) -> Self {
        Self {
            learning_rate,
            step: 0,
            layers: layers
                .iter()
                .map(|layer| LayerMoments {
                    weights: Moments::zeros_like(&layer.weights),
                    bias: Moments::zeros_like(&layer.bias),
                })
                .collect(),
        }
    }

    #[cfg(test)]
    pub fn steps(&self) -> i32 {
        self.step
    }

    /// `layers` and `grads` must be in the order the optimizer was built with.
    pub fn step(&mut self, layers: [&mut Dense; 2], grads: [&DenseGradients; 2]) {
        self.step = self.step.saturating_add(1);
        for ((moments, layer), grad) in self.layers.iter_mut().zip(layers).zip(grads) {
            moments
                .weights
                .apply(&mut layer.weights, &grad.weights, self.learning_rate, self.step);
            moments
                .bias
                .apply(&mut layer.bias, &grad.bias, self.learning_rate, self.step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    #[test]
    fn test_first_step_moves_against_gradient_by_learning_rate() {
        let mut a = Dense {
            weights: array![[1.0, -1.0]],
            bias: Array1::zeros(2),
        };
        let mut b = Dense {
            weights: array![[0.5], [0.5]],
            bias: Array1::zeros(1),
        };
        let mut adam = Adam::new(0.1, &[&a, &b]);

        let grad_a = DenseGradients {
            weights: array![[2.0, -3.0]],
            bias: array![0.0, 0.0],
        };
        let grad_b = DenseGradients {
            weights: array![[0.0], [0.0]],
            bias: array![1.0],
        };
        adam.step([&mut a, &mut b], [&grad_a, &grad_b]);

        // The bias-corrected first step is lr * sign(g).
        assert!((a.weights[[0, 0]] - 0.9).abs() < 1e-4);
        assert!((a.weights[[0, 1]] - -0.9).abs() < 1e-4);
        assert!((b.bias[0] - -0.1).abs() < 1e-4);
        assert_eq!(b.weights, array![[0.5], [0.5]]);
        assert_eq!(adam.steps(), 1);
    }
}
