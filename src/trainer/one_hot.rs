use crate::error::SessionError;
use ndarray::Array2;

/// Encodes class labels as rows of width `num_classes` with a single 1.0.
pub fn one_hot(labels: &[usize], num_classes: usize) -> Result<Array2<f32>, SessionError> {
    let mut encoded = Array2::zeros((labels.len(), num_classes));
    for (row, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(SessionError::InvalidClass {
                class_id: label,
                num_classes,
            });
        }
        encoded[[row, label]] = 1.0;
    }
    Ok(encoded)
}
