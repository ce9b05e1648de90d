//! Co-indexed storage for gathered (embedding, label) pairs.

mod embedding;

pub use embedding::Embedding;

use crate::error::SessionError;
use rand::Rng;

#[derive(Debug)]
pub struct SampleBuffer {
    embeddings: Vec<Embedding>,
    labels: Vec<usize>,
    counts: Vec<usize>,
    embedding_dim: usize,
}

impl SampleBuffer {
    pub fn new(num_classes: usize, embedding_dim: usize) -> Self {
        Self {
            embeddings: Vec::new(),
            labels: Vec::new(),
            counts: vec![0; num_classes],
            embedding_dim,
        }
    }

    pub fn append(&mut self, embedding: Embedding, label: usize) -> Result<(), SessionError> {
        if label >= self.counts.len() {
            return Err(SessionError::InvalidClass {
                class_id: label,
                num_classes: self.counts.len(),
            });
        }
        if embedding.len() != self.embedding_dim {
            return Err(SessionError::ShapeMismatch {
                expected: vec![self.embedding_dim],
                got: vec![embedding.len()],
            });
        }

        self.embeddings.push(embedding);
        self.labels.push(label);
        self.counts[label] += 1;
        Ok(())
    }

    /// Fisher-Yates over both sequences at once: every swap is applied to
    /// embeddings and labels together, so pairs can never drift apart.
    pub fn paired_shuffle<R: Rng>(&mut self, rng: &mut R) {
        for i in (1..self.labels.len()).rev() {
            let j = rng.random_range(0..=i);
            self.embeddings.swap(i, j);
            self.labels.swap(i, j);
        }
    }

    /// Drops every embedding (releasing its allocation) and zeroes the counts.
    pub fn clear(&mut self) {
        self.embeddings.clear();
        self.labels.clear();
        self.counts.iter_mut().for_each(|count| *count = 0);
    }

    pub fn counts_by_class(&self) -> &[usize] {
        &self.counts
    }

    /// Classes without a single sample.
    pub fn missing_classes(&self) -> Vec<usize> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(class_id, _)| class_id)
            .collect()
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

#[cfg(test)]
mod tests;
