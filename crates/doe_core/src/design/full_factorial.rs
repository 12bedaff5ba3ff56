//! Full factorial construction: every combination of every factor's levels.

use crate::catalog::FactorCatalog;
use crate::design::MAX_FULL_FACTORIAL_RUNS;
use crate::error::DesignError;
use crate::factor::FactorValue;

/// Build the Cartesian product of all level sequences.
///
/// The first declared factor varies fastest; levels keep declared order.
/// The run-count ceiling is checked with saturating arithmetic before a
/// single row is allocated.
pub(super) fn build(catalog: &FactorCatalog) -> Result<Vec<Vec<FactorValue>>, DesignError> {
    let counts: Vec<usize> = catalog.iter().map(|factor| factor.level_count()).collect();

    let mut total: u128 = 1;
    for &count in &counts {
        total = total.saturating_mul(count as u128);
    }
    if total > MAX_FULL_FACTORIAL_RUNS as u128 {
        return Err(DesignError::CombinatorialExplosion {
            runs: total,
            limit: MAX_FULL_FACTORIAL_RUNS,
        });
    }

    let total = total as usize;
    let levels: Vec<Vec<FactorValue>> = catalog
        .iter()
        .map(|factor| factor.realized_levels())
        .collect();

    let mut runs = Vec::with_capacity(total);
    for run_index in 0..total {
        let mut values = Vec::with_capacity(counts.len());
        let mut remainder = run_index;
        for (column, count) in counts.iter().enumerate() {
            values.push(levels[column][remainder % count].clone());
            remainder /= count;
        }
        runs.push(values);
    }
    Ok(runs)
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
    fn run_count_is_product_of_level_counts() {
        let runs = build(&catalog()).unwrap();
        assert_eq!(runs.len(), 4 * 2);
    }

    #[test]
    fn first_factor_varies_fastest() {
        let runs = build(&catalog()).unwrap();
        assert_eq!(runs[0][0], FactorValue::Number(1.0));
        assert_eq!(runs[1][0], FactorValue::Number(4.0));
        assert_eq!(runs[0][1], FactorValue::Text("fast".to_string()));
        assert_eq!(runs[3][1], FactorValue::Text("fast".to_string()));
        assert_eq!(runs[4][1], FactorValue::Text("slow".to_string()));
    }

    #[test]
    fn every_combination_appears_exactly_once() {
        let runs = build(&catalog()).unwrap();
        let mut seen = std::collections::HashSet::new();
        for run in &runs {
            let key = format!("{}|{}", run[0], run[1]);
            assert!(seen.insert(key), "duplicate combination in {run:?}");
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn explosion_is_rejected_before_allocation() {
        let catalog = FactorCatalog::new(vec![
            Factor::numeric("a", 0.0, 199.0, 1.0).unwrap(),
            Factor::numeric("b", 0.0, 199.0, 1.0).unwrap(),
            Factor::numeric("c", 0.0, 199.0, 1.0).unwrap(),
        ])
        .unwrap();
        let error = build(&catalog).expect_err("8M runs should be rejected");
        assert_eq!(
            error,
            DesignError::CombinatorialExplosion {
                runs: 8_000_000,
                limit: MAX_FULL_FACTORIAL_RUNS,
            }
        );
    }
}
