#[cfg(test)]
mod head_test {
    use crate::classifier_head::{argmax, ClassifierHead, Loss};
    use crate::error::SessionError;
    use ndarray::{array, Array1, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn head(embedding_dim: usize, num_classes: usize, learning_rate: f32) -> ClassifierHead {
        let mut rng = StdRng::seed_from_u64(42);
        ClassifierHead::new(embedding_dim, 16, num_classes, learning_rate, &mut rng)
    }

    #[test]
    fn test_output_is_a_distribution_over_classes() {
        let head = head(4, 3, 0.001);
        let probs = head.predict(&array![0.1, 0.2, 0.3, 0.4].view()).unwrap();

        assert_eq!(probs.len(), 3);
        assert!((probs.sum() - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_loss_follows_class_count() {
        assert_eq!(head(4, 2, 0.001).loss(), Loss::BinaryCrossentropy);
        assert_eq!(head(4, 5, 0.001).loss(), Loss::CategoricalCrossentropy);
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let head = head(4, 2, 0.001);
        let result = head.predict(&array![1.0, 2.0].view());
        assert!(matches!(result, Err(SessionError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_training_separates_two_clusters() {
        let mut head = head(3, 2, 0.05);
        let inputs: Array2<f32> = array![
            [1.0, 0.0, 0.0],
            [0.9, 0.1, 0.0],
            [0.0, 0.1, 0.9],
            [0.0, 0.0, 1.0],
        ];
        let targets: Array2<f32> = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];

        let first = head.train_batch(&inputs.view(), &targets.view()).unwrap();
        let mut last = first;
        for _ in 0..200 {
            last = head.train_batch(&inputs.view(), &targets.view()).unwrap();
        }

        assert!(last.loss < first.loss);
        assert_eq!(last.correct, 4);
        let probs = head.predict(&array![1.0, 0.0, 0.0].view()).unwrap();
        assert_eq!(argmax(probs.view()), Some(0));
        let probs = head.predict(&array![0.0, 0.0, 1.0].view()).unwrap();
        assert_eq!(argmax(probs.view()), Some(1));
    }

    #[test]
    fn test_non_finite_loss_leaves_weights_untouched() {
        let mut head = head(2, 2, 0.01);
        let before = head.weights();

        let inputs = array![[f32::NAN, 0.0]];
        let targets = array![[1.0, 0.0]];
        let result = head.train_batch(&inputs.view(), &targets.view());

        assert!(matches!(result, Err(SessionError::Fit(_))));
        assert_eq!(head.weights(), before);
    }

    #[test]
    fn test_weights_round_trip_gives_same_outputs() {
        let original = head(3, 2, 0.001);
        let restored = ClassifierHead::from_weights(original.weights(), 0.001);
        let input: Array1<f32> = array![0.3, 0.6, 0.9];

        assert_eq!(
            original.predict(&input.view()).unwrap(),
            restored.predict(&input.view()).unwrap()
        );
    }
}
