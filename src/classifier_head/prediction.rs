use ndarray::ArrayView1;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_id: usize,
    pub class_name: String,
    /// Whole percent, floored, in `[0, 100]`.
    pub confidence: u8,
}

impl Prediction {
    pub fn from_probabilities(probabilities: ArrayView1<f32>, class_names: &[String]) -> Option<Self> {
        let class_id = argmax(probabilities)?;
        let probability = probabilities[class_id];
        let confidence = (probability * 100.0).floor().clamp(0.0, 100.0) as u8;

        Some(Self {
            class_id,
            class_name: class_names
                .get(class_id)
                .cloned()
                .unwrap_or_else(|| format!("class {}", class_id + 1)),
            confidence,
        })
    }
}

/// Index of the largest finite value; ties go to the lowest index.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, best_value)) if best_value >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_prediction_picks_highest_class() {
        let names = vec!["cat".to_string(), "dog".to_string()];
        let prediction = Prediction::from_probabilities(array![0.126, 0.874].view(), &names).unwrap();

        assert_eq!(prediction.class_id, 1);
        assert_eq!(prediction.class_name, "dog");
        assert_eq!(prediction.confidence, 87);
    }

    #[test]
    fn test_certain_prediction_is_100_percent() {
        let names = vec!["a".to_string(), "b".to_string()];
        let prediction = Prediction::from_probabilities(array![1.0, 0.0].view(), &names).unwrap();
        assert_eq!(prediction.confidence, 100);
    }

    #[test]
    fn test_argmax_ties_and_nan() {
        assert_eq!(argmax(array![0.5, 0.5].view()), Some(0));
        assert_eq!(argmax(array![f32::NAN, 0.1].view()), Some(1));
        assert_eq!(argmax(array![f32::NAN].view()), None);
    }
}
