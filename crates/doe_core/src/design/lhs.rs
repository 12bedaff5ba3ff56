//! Latin hypercube sampling: stratified coverage of every factor.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::catalog::FactorCatalog;
use crate::factor::FactorValue;

/// Build an N-run Latin hypercube over the catalog.
pub(super) fn build(catalog: &FactorCatalog, samples: usize, seed: u64) -> Vec<Vec<FactorValue>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let matrix = unit_samples(catalog.len(), samples, &mut rng);
    materialize(catalog, &matrix)
}

/// Draw a `samples x factors` matrix of unit samples in `[0, 1)`.
///
/// Each factor gets an independent random permutation of its `samples`
/// strata plus one uniform draw inside each stratum, so every stratum of
/// every factor is used exactly once across the runs.
pub(super) fn unit_samples(factors: usize, samples: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; factors]; samples];
    for column in 0..factors {
        let mut strata: Vec<usize> = (0..samples).collect();
        strata.shuffle(rng);
        for (row, &stratum) in strata.iter().enumerate() {
            let jitter: f64 = rng.gen();
            matrix[row][column] = (stratum as f64 + jitter) / samples as f64;
        }
    }
    matrix
}

/// Map unit samples onto realized factor levels.
pub(super) fn materialize(catalog: &FactorCatalog, matrix: &[Vec<f64>]) -> Vec<Vec<FactorValue>> {
    matrix
        .iter()
        .map(|row| {
            catalog
                .iter()
                .zip(row.iter())
                .map(|(factor, &u)| factor.level_for_unit_sample(u))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::Factor;

    fn catalog() -> FactorCatalog {
        FactorCatalog::new(vec![
            Factor::numeric("speed", 1.0, 10.0, 3.0).unwrap(),
            Factor::categorical("mode", ["fast", "slow"]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn every_stratum_of_every_factor_is_used_exactly_once() {
        let samples = 16;
        let factors = 3;
        let mut rng = StdRng::seed_from_u64(7);
        let matrix = unit_samples(factors, samples, &mut rng);

        for column in 0..factors {
            let mut occupancy = vec![0usize; samples];
            for row in &matrix {
                let stratum = (row[column] * samples as f64) as usize;
                occupancy[stratum] += 1;
            }
            assert!(
                occupancy.iter().all(|&count| count == 1),
                "column {column} occupancy {occupancy:?}"
            );
        }
    }

    #[test]
    fn unit_samples_stay_in_half_open_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = unit_samples(2, 32, &mut rng);
        for row in &matrix {
            for &u in row {
                assert!((0.0..1.0).contains(&u), "sample {u} out of range");
            }
        }
    }

    #[test]
    fn requested_sample_count_is_honored() {
        let runs = build(&catalog(), 8, 42);
        assert_eq!(runs.len(), 8);
        for run in &runs {
            assert_eq!(run.len(), 2);
        }
    }

    #[test]
    fn materialized_values_are_valid_levels() {
        let catalog = catalog();
        let runs = build(&catalog, 12, 99);
        let speed_levels = catalog.get("speed").unwrap().realized_levels();
        let mode_levels = catalog.get("mode").unwrap().realized_levels();
        for run in &runs {
            assert!(speed_levels.contains(&run[0]), "unexpected level {:?}", run[0]);
            assert!(mode_levels.contains(&run[1]), "unexpected level {:?}", run[1]);
        }
    }

    #[test]
    fn same_seed_reproduces_the_matrix() {
        let first = build(&catalog(), 8, 5);
        let second = build(&catalog(), 8, 5);
        assert_eq!(first, second);
    }
}
