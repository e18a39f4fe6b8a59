//! Seeded train/test split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle row indices and split off the test fraction. The same seed
/// always reproduces the same partition. Both sides are kept non-empty
/// whenever `n >= 2`.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut n_test = (n as f64 * test_size).round() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    }

    let test = indices.split_off(n - n_test);
    (indices, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn split_is_reproducible() {
        let (train_a, test_a) = train_test_split(100, 0.2, 42);
        let (train_b, test_b) = train_test_split(100, 0.2, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        let (_, test_a) = train_test_split(100, 0.2, 42);
        let (_, test_b) = train_test_split(100, 0.2, 7);
        assert_ne!(test_a, test_b);
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        let (train, test) = train_test_split(50, 0.2, 1);
        assert_eq!(train.len(), 40);
        assert_eq!(test.len(), 10);

        let all: HashSet<usize> = train.iter().chain(test.iter()).copied().collect();
        assert_eq!(all.len(), 50);
    }

    #[test]
    fn both_sides_stay_non_empty() {
        let (train, test) = train_test_split(2, 0.01, 3);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);

        let (train, test) = train_test_split(3, 0.99, 3);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 2);
    }
}
