use crate::library::memory::Allocation;
use ndarray::Array1;

/// One extractor output. Owns its allocation, so dropping the embedding
/// releases it.
#[derive(Debug)]
pub struct Embedding {
    values: Array1<f32>,
    _allocation: Allocation,
}

impl Embedding {
    pub fn new(values: Array1<f32>, allocation: Allocation) -> Self {
        Self {
            values,
            _allocation: allocation,
        }
    }

    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}
