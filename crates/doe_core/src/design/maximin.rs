//! Space-filling LHS: maximin selection over a pool of candidate designs.
//!
//! Plain LHS can cluster points. This search draws a pool of independent
//! candidates and keeps the one whose closest pair of runs is furthest
//! apart in unit space. Candidate seeds derive from the caller's seed, and
//! selection compares (score, candidate index), so the winner is identical
//! no matter how many rayon threads score the pool.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::catalog::FactorCatalog;
use crate::design::lhs;
use crate::factor::FactorValue;

pub(super) fn build(
    catalog: &FactorCatalog,
    samples: usize,
    candidates: usize,
    seed: u64,
) -> Vec<Vec<FactorValue>> {
    let pool: Vec<Vec<Vec<f64>>> = (0..candidates)
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(candidate_seed(seed, index));
            lhs::unit_samples(catalog.len(), samples, &mut rng)
        })
        .collect();

    let scores: Vec<f64> = pool.par_iter().map(|m| min_pairwise_distance(m)).collect();

    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = index;
        }
    }

    lhs::materialize(catalog, &pool[best])
}

pub(super) fn candidate_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add(index as u64).wrapping_mul(0x9e3779b9)
}

/// Smallest Euclidean distance between any two rows of the unit matrix.
/// A single-run design has no pairs and scores infinity.
pub(super) fn min_pairwise_distance(matrix: &[Vec<f64>]) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..matrix.len() {
        for j in (i + 1)..matrix.len() {
            let squared: f64 = matrix[i]
                .iter()
                .zip(matrix[j].iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            min = min.min(squared.sqrt());
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::Factor;

    fn catalog() -> FactorCatalog {
        FactorCatalog::new(vec![
            Factor::numeric("x", 0.0, 1.0, 0.05).unwrap(),
            Factor::numeric("y", 0.0, 1.0, 0.05).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn selected_candidate_beats_the_rest_of_its_pool() {
        let seed = 77;
        let samples = 10;
        let candidates = 8;
        let catalog = catalog();

        // Regenerate the exact pool the search saw and brute-force its scores.
        let pool: Vec<Vec<Vec<f64>>> = (0..candidates)
            .map(|index| {
                let mut rng = StdRng::seed_from_u64(candidate_seed(seed, index));
                lhs::unit_samples(catalog.len(), samples, &mut rng)
            })
            .collect();
        let scores: Vec<f64> = pool.iter().map(|m| min_pairwise_distance(m)).collect();
        let best_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let winner_index = scores
            .iter()
            .position(|&score| score == best_score)
            .unwrap();
        let expected = lhs::materialize(&catalog, &pool[winner_index]);

        let selected = build(&catalog, samples, candidates, seed);
        assert_eq!(selected, expected);
    }

    #[test]
    fn selection_is_deterministic_across_runs() {
        let first = build(&catalog(), 12, 10, 1234);
        let second = build(&catalog(), 12, 10, 1234);
        assert_eq!(first, second);
    }

    #[test]
    fn min_pairwise_distance_of_known_points() {
        let matrix = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![0.0, 1.0]];
        assert!((min_pairwise_distance(&matrix) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_run_scores_infinity() {
        let matrix = vec![vec![0.5, 0.5]];
        assert_eq!(min_pairwise_distance(&matrix), f64::INFINITY);
    }
}
