#[cfg(test)]
mod buffer_test {
    use crate::error::SessionError;
    use crate::library::memory::MemoryTracker;
    use crate::sample_buffer::{Embedding, SampleBuffer};
    use ndarray::Array1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn embedding(tracker: &MemoryTracker, tag: f32) -> Embedding {
        Embedding::new(Array1::from(vec![tag, tag * 2.0]), tracker.allocate())
    }

    fn pairs(buffer: &SampleBuffer) -> Vec<(Vec<u32>, usize)> {
        let mut pairs: Vec<(Vec<u32>, usize)> = buffer
            .embeddings()
            .iter()
            .zip(buffer.labels())
            .map(|(e, l)| (e.values().iter().map(|v| v.to_bits()).collect(), *l))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_lengths_and_counts_stay_in_sync() {
        let tracker = MemoryTracker::new();
        let mut buffer = SampleBuffer::new(3, 2);
        let labels = [0, 2, 2, 1, 0, 2, 0];

        for (i, label) in labels.iter().enumerate() {
            buffer.append(embedding(&tracker, i as f32), *label).unwrap();

            assert_eq!(buffer.embeddings().len(), buffer.labels().len());
            assert_eq!(buffer.counts_by_class().iter().sum::<usize>(), buffer.len());
        }

        assert_eq!(buffer.counts_by_class(), &[3, 1, 3]);
        assert_eq!(tracker.live(), labels.len());
    }

    #[test]
    fn test_rejected_append_releases_embedding() {
        let tracker = MemoryTracker::new();
        let mut buffer = SampleBuffer::new(2, 2);

        let result = buffer.append(embedding(&tracker, 1.0), 5);
        assert!(matches!(
            result,
            Err(SessionError::InvalidClass {
                class_id: 5,
                num_classes: 2
            })
        ));

        let wrong = Embedding::new(Array1::zeros(3), tracker.allocate());
        assert!(matches!(
            buffer.append(wrong, 0),
            Err(SessionError::ShapeMismatch { .. })
        ));

        assert!(buffer.is_empty());
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_paired_shuffle_preserves_pairs() {
        let tracker = MemoryTracker::new();
        let mut buffer = SampleBuffer::new(4, 2);
        for i in 0..40 {
            buffer.append(embedding(&tracker, i as f32), i % 4).unwrap();
        }
        let before = pairs(&buffer);
        let order_before: Vec<f32> = buffer.embeddings().iter().map(|e| e.values()[0]).collect();

        let mut rng = StdRng::seed_from_u64(7);
        buffer.paired_shuffle(&mut rng);

        let order_after: Vec<f32> = buffer.embeddings().iter().map(|e| e.values()[0]).collect();
        assert_eq!(pairs(&buffer), before);
        assert_ne!(order_before, order_after);
        assert_eq!(buffer.counts_by_class(), &[10, 10, 10, 10]);
        for (e, l) in buffer.embeddings().iter().zip(buffer.labels()) {
            assert_eq!(e.values()[0] as usize % 4, *l);
        }
    }

    #[test]
    fn test_paired_shuffle_reaches_every_permutation() {
        let tracker = MemoryTracker::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashMap::new();

        for _ in 0..6000 {
            let mut buffer = SampleBuffer::new(3, 2);
            for i in 0..3 {
                buffer.append(embedding(&tracker, i as f32), i).unwrap();
            }
            buffer.paired_shuffle(&mut rng);
            *seen.entry(buffer.labels().to_vec()).or_insert(0usize) += 1;
        }

        // 3! permutations, each roughly 1000 times
        assert_eq!(seen.len(), 6);
        assert!(seen.values().all(|count| (800..1200).contains(count)));
    }

    #[test]
    fn test_shuffle_of_empty_and_single_is_noop() {
        let tracker = MemoryTracker::new();
        let mut rng = StdRng::seed_from_u64(1);

        let mut empty = SampleBuffer::new(2, 2);
        empty.paired_shuffle(&mut rng);
        assert!(empty.is_empty());

        let mut single = SampleBuffer::new(2, 2);
        single.append(embedding(&tracker, 3.0), 1).unwrap();
        single.paired_shuffle(&mut rng);
        assert_eq!(single.labels(), &[1]);
    }

    #[test]
    fn test_clear_releases_everything() {
        let tracker = MemoryTracker::new();
        let mut buffer = SampleBuffer::new(2, 2);
        for i in 0..5 {
            buffer.append(embedding(&tracker, i as f32), i % 2).unwrap();
        }
        assert_eq!(tracker.live(), 5);

        buffer.clear();

        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.counts_by_class(), &[0, 0]);
        assert_eq!(buffer.missing_classes(), vec![0, 1]);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_missing_classes() {
        let tracker = MemoryTracker::new();
        let mut buffer = SampleBuffer::new(3, 2);
        buffer.append(embedding(&tracker, 1.0), 1).unwrap();
        assert_eq!(buffer.missing_classes(), vec![0, 2]);
    }
}
