//! Trainable head: Dense(ReLU) followed by Dense(softmax).

mod adam;
mod dense;
mod loss;
mod prediction;

pub use adam::Adam;
pub use dense::{Dense, DenseGradients};
pub use loss::Loss;
pub use prediction::{argmax, Prediction};

use crate::error::SessionError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Serialisable snapshot of the head's weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadWeights {
    pub hidden: Dense,
    pub output: Dense,
    pub loss: Loss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStats {
    pub loss: f32,
    pub correct: usize,
}

#[derive(Debug, Clone)]
pub struct ClassifierHead {
    hidden: Dense,
    output: Dense,
    loss: Loss,
    optimizer: Adam,
}

impl ClassifierHead {
    pub fn new<R: Rng>(
        embedding_dim: usize,
        hidden_units: usize,
        num_classes: usize,
        learning_rate: f32,
        rng: &mut R,
    ) -> Self {
        let hidden = Dense::glorot(embedding_dim, hidden_units, rng);
        let output = Dense::glorot(hidden_units, num_classes, rng);
        let optimizer = Adam::new(learning_rate, &[&hidden, &output]);

        Self {
            hidden,
            output,
            loss: Loss::for_classes(num_classes),
            optimizer,
        }
    }

    pub fn from_weights(weights: HeadWeights, learning_rate: f32) -> Self {
        let optimizer = Adam::new(learning_rate, &[&weights.hidden, &weights.output]);
        Self {
            hidden: weights.hidden,
            output: weights.output,
            loss: weights.loss,
            optimizer,
        }
    }

    pub fn weights(&self) -> HeadWeights {
        HeadWeights {
            hidden: self.hidden.clone(),
            output: self.output.clone(),
            loss: self.loss,
        }
    }

    pub fn embedding_dim(&self) -> usize {
        self.hidden.inputs()
    }

    pub fn num_classes(&self) -> usize {
        self.output.units()
    }

    #[cfg(test)]
    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn summary(&self) -> String {
        format!(
            "dense({} -> {}, relu) -> dense({} -> {}, softmax), loss {:?}",
            self.hidden.inputs(),
            self.hidden.units(),
            self.output.inputs(),
            self.output.units(),
            self.loss
        )
    }

    /// Class probabilities for each row of `inputs`.
    pub fn forward(&self, inputs: &ArrayView2<f32>) -> Result<Array2<f32>, SessionError> {
        self.check_width(inputs.ncols())?;
        let activations = relu(&self.hidden.forward(inputs));
        Ok(softmax(&self.output.forward(&activations.view())))
    }

    pub fn predict(&self, embedding: &ArrayView1<f32>) -> Result<Array1<f32>, SessionError> {
        let batch = embedding.view().insert_axis(Axis(0));
        let probs = self.forward(&batch)?;
        Ok(probs.index_axis_move(Axis(0), 0))
    }

    /// One gradient step on a mini-batch. Weights are left untouched if the
    /// loss is not finite.
    pub fn train_batch(
        &mut self,
        inputs: &ArrayView2<f32>,
        targets: &ArrayView2<f32>,
    ) -> Result<BatchStats, SessionError> {
        self.check_width(inputs.ncols())?;
        if targets.ncols() != self.num_classes() || targets.nrows() != inputs.nrows() {
            return Err(SessionError::ShapeMismatch {
                expected: vec![inputs.nrows(), self.num_classes()],
                got: targets.shape().to_vec(),
            });
        }

        let pre_activation = self.hidden.forward(inputs);
        let activations = relu(&pre_activation);
        let probs = softmax(&self.output.forward(&activations.view()));
        let targets = targets.to_owned();

        let loss = self.loss.value(&probs, &targets);
        if !loss.is_finite() {
            return Err(SessionError::Fit(format!("loss is not finite ({})", loss)));
        }

        let correct = probs
            .outer_iter()
            .zip(targets.outer_iter())
            .filter(|(p, y)| argmax(p.view()).is_some() && argmax(p.view()) == argmax(y.view()))
            .count();

        // Softmax backward: dz = p * (g - sum(g * p))
        let grad_probs = self.loss.gradient(&probs, &targets);
        let weighted = (&grad_probs * &probs).sum_axis(Axis(1)).insert_axis(Axis(1));
        let grad_logits = &probs * &(&grad_probs - &weighted);

        let output_grads = DenseGradients {
            weights: activations.t().dot(&grad_logits),
            bias: grad_logits.sum_axis(Axis(0)),
        };

        let grad_activations = grad_logits.dot(&self.output.weights.t());
        let grad_hidden = grad_activations * &pre_activation.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
        let hidden_grads = DenseGradients {
            weights: inputs.t().dot(&grad_hidden),
            bias: grad_hidden.sum_axis(Axis(0)),
        };

        self.optimizer.step(
            [&mut self.hidden, &mut self.output],
            [&hidden_grads, &output_grads],
        );

        Ok(BatchStats { loss, correct })
    }

    fn check_width(&self, width: usize) -> Result<(), SessionError> {
        if width != self.embedding_dim() {
            return Err(SessionError::ShapeMismatch {
                expected: vec![self.embedding_dim()],
                got: vec![width],
            });
        }
        Ok(())
    }
}

/// NaN passes through so a broken embedding surfaces as a non-finite loss.
fn relu(values: &Array2<f32>) -> Array2<f32> {
    values.mapv(|v| if v < 0.0 { 0.0 } else { v })
}

fn softmax(logits: &Array2<f32>) -> Array2<f32> {
    let mut probs = logits.clone();
    for mut row in probs.outer_iter_mut() {
        let max = row.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    probs
}

#[cfg(test)]
mod tests;
