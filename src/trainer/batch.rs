use crate::error::SessionError;
use crate::library::memory::{Allocation, MemoryTracker};
use crate::sample_buffer::SampleBuffer;
use crate::trainer::one_hot::one_hot;
use ndarray::{Array2, Axis};

/// The stacked inputs and one-hot targets for one `fit` call.
/// Allocated right before fitting and released when dropped, whether the
/// fit succeeded or not.
pub struct TrainingBatch {
    pub inputs: Array2<f32>,
    pub targets: Array2<f32>,
    _allocations: [Allocation; 2],
}

impl TrainingBatch {
    pub fn stack(buffer: &SampleBuffer, memory: &MemoryTracker) -> Result<Self, SessionError> {
        let targets = one_hot(buffer.labels(), buffer.num_classes())?;
        let targets_allocation = memory.allocate();

        let views: Vec<_> = buffer.embeddings().iter().map(|e| e.values().view()).collect();
        let inputs = if views.is_empty() {
            Array2::zeros((0, buffer.embedding_dim()))
        } else {
            ndarray::stack(Axis(0), &views)?
        };
        let inputs_allocation = memory.allocate();

        Ok(Self {
            inputs,
            targets,
            _allocations: [targets_allocation, inputs_allocation],
        })
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }
}
