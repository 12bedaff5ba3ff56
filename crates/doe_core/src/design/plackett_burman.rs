//! Plackett-Burman screening designs via cyclic generator rows.
//!
//! Run count is the smallest multiple of 4 that is >= factor count + 1.
//! The first N-1 rows are cyclic shifts of a tabulated generator row; the
//! last row is all low. Coded -1 maps to a factor's low extreme and +1 to
//! its high extreme (numeric min/max, categorical first/last declared), an
//! explicit two-level simplification of multi-level factors.

use crate::catalog::FactorCatalog;
use crate::error::DesignError;
use crate::factor::FactorValue;

/// Tabulated generator rows, indexed by run count.
const GENERATORS: &[(usize, &[i8])] = &[
    (4, &[1, 1, -1]),
    (8, &[1, 1, 1, -1, 1, -1, -1]),
    (12, &[1, 1, -1, 1, 1, 1, -1, -1, -1, 1, -1]),
    (16, &[1, 1, 1, 1, -1, 1, -1, 1, 1, -1, -1, 1, -1, -1, -1]),
    (
        20,
        &[1, 1, -1, -1, 1, 1, 1, 1, -1, 1, -1, 1, -1, -1, -1, -1, 1, 1, -1],
    ),
    (
        24,
        &[
            1, 1, 1, 1, 1, -1, 1, -1, 1, 1, -1, -1, 1, 1, -1, -1, 1, -1, 1, -1, -1, -1, -1,
        ],
    ),
];

/// Largest factor count covered by the generator table.
const MAX_FACTORS: usize = 23;

pub(super) fn build(catalog: &FactorCatalog) -> Result<Vec<Vec<FactorValue>>, DesignError> {
    let factors = catalog.len();
    let runs = run_count_for(factors);
    let generator = GENERATORS
        .iter()
        .find(|(n, _)| *n == runs)
        .map(|(_, row)| *row)
        .ok_or(DesignError::TooManyFactors {
            count: factors,
            limit: MAX_FACTORS,
        })?;

    let width = runs - 1;
    let mut plan = Vec::with_capacity(runs);
    for row in 0..runs {
        let values = catalog
            .iter()
            .enumerate()
            .map(|(column, factor)| {
                let coded = if row == runs - 1 {
                    -1
                } else {
                    // Row r is the generator cyclically shifted right by r.
                    generator[(column + width - row) % width]
                };
                if coded < 0 {
                    factor.low_extreme()
                } else {
                    factor.high_extreme()
                }
            })
            .collect();
        plan.push(values);
    }
    Ok(plan)
}

/// Smallest multiple of 4 that is >= factors + 1.
pub(super) fn run_count_for(factors: usize) -> usize {
    (factors + 1).div_ceil(4) * 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::Factor;

    fn catalog_of(count: usize) -> FactorCatalog {
        let factors = (0..count)
            .map(|i| Factor::numeric(format!("f{i}"), 0.0, 1.0, 1.0).unwrap())
            .collect();
        FactorCatalog::new(factors).unwrap()
    }

    #[test]
    fn run_count_is_smallest_multiple_of_four_above_factor_count() {
        assert_eq!(run_count_for(3), 4);
        assert_eq!(run_count_for(4), 8);
        assert_eq!(run_count_for(7), 8);
        assert_eq!(run_count_for(8), 12);
        assert_eq!(run_count_for(11), 12);
        assert_eq!(run_count_for(19), 20);
        assert_eq!(run_count_for(23), 24);
    }

    #[test]
    fn each_factor_hits_both_extremes_in_equal_proportion() {
        for factors in [3usize, 4, 7, 11, 15, 19, 23] {
            let catalog = catalog_of(factors);
            let plan = build(&catalog).unwrap();
            let runs = plan.len();
            assert_eq!(runs, run_count_for(factors));

            for column in 0..factors {
                let highs = plan
                    .iter()
                    .filter(|row| row[column] == FactorValue::Number(1.0))
                    .count();
                assert_eq!(highs, runs / 2, "{factors} factors, column {column}");
            }
        }
    }

    #[test]
    fn values_are_only_extremes() {
        let catalog = FactorCatalog::new(vec![
            Factor::numeric("speed", 1.0, 10.0, 3.0).unwrap(),
            Factor::categorical("mode", ["low", "mid", "high"]).unwrap(),
        ])
        .unwrap();
        let plan = build(&catalog).unwrap();
        for row in &plan {
            assert!(matches!(row[0], FactorValue::Number(v) if v == 1.0 || v == 10.0));
            assert!(matches!(
                &row[1],
                FactorValue::Text(label) if label == "low" || label == "high"
            ));
        }
    }

    #[test]
    fn too_many_factors_are_rejected() {
        let error = build(&catalog_of(24)).expect_err("24 factors exceed the table");
        assert_eq!(
            error,
            DesignError::TooManyFactors {
                count: 24,
                limit: 23
            }
        );
    }
}
