//! Design strategies and the generation entry point.
//!
//! `generate` is a pure function from catalog, strategy and seed to an
//! experiment plan: no I/O, no clocks. Deterministic strategies ignore the
//! seed; stochastic ones are fully reproducible from it, so regenerating
//! with identical inputs yields a bit-identical plan.

use serde::{Deserialize, Serialize};

use crate::catalog::FactorCatalog;
use crate::error::DesignError;
use crate::plan::ExperimentPlan;

mod full_factorial;
mod lhs;
mod maximin;
mod plackett_burman;

/// Hard ceiling on full-factorial run counts, checked before any allocation.
pub const MAX_FULL_FACTORIAL_RUNS: u64 = 1_000_000;

/// Default candidate-pool size for the space-filling LHS search.
pub const DEFAULT_MAXIMIN_CANDIDATES: usize = 10;

/// The experiment-design strategies this generator supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Design {
    /// Every combination of every factor's levels, first factor varying
    /// fastest.
    FullFactorial,
    /// Stratified random sampling: each factor's range is split into
    /// `samples` strata and each stratum is used exactly once.
    LatinHypercube { samples: usize },
    /// Latin hypercube selected from a candidate pool by the maximin
    /// criterion (largest minimum pairwise distance in unit space).
    SpaceFillingLhs { samples: usize, candidates: usize },
    /// Two-level screening design; run count is the smallest multiple of 4
    /// that is >= factor count + 1. Factors are discretized to their two
    /// extreme levels.
    PlackettBurman,
}

impl Design {
    /// Short identifier used in plan labels and export file names.
    pub fn slug(&self) -> &'static str {
        match self {
            Design::FullFactorial => "fullfac",
            Design::LatinHypercube { .. } => "lhs",
            Design::SpaceFillingLhs { .. } => "spacefillinglhs",
            Design::PlackettBurman => "plackettburman",
        }
    }
}

/// Generate an experiment plan for `catalog` under `design`.
///
/// The plan label is derived from the design slug and seed so that
/// regeneration with identical inputs reproduces the plan exactly.
///
/// # Errors
///
/// `EmptyCatalog` for a catalog with no factors, `InvalidSampleCount` for
/// sampling designs asked for zero samples, `CombinatorialExplosion` when a
/// full factorial would exceed [`MAX_FULL_FACTORIAL_RUNS`], and
/// `TooManyFactors` when no Plackett-Burman generator row covers the
/// catalog.
pub fn generate(
    catalog: &FactorCatalog,
    design: &Design,
    seed: u64,
) -> Result<ExperimentPlan, DesignError> {
    if catalog.is_empty() {
        return Err(DesignError::EmptyCatalog);
    }

    let runs = match design {
        Design::FullFactorial => full_factorial::build(catalog)?,
        Design::LatinHypercube { samples } => {
            ensure_samples(*samples)?;
            lhs::build(catalog, *samples, seed)
        }
        Design::SpaceFillingLhs {
            samples,
            candidates,
        } => {
            ensure_samples(*samples)?;
            let pool = if *candidates == 0 {
                DEFAULT_MAXIMIN_CANDIDATES
            } else {
                *candidates
            };
            maximin::build(catalog, *samples, pool, seed)
        }
        Design::PlackettBurman => plackett_burman::build(catalog)?,
    };

    let label = format!("{}_{seed:08x}", design.slug());
    Ok(ExperimentPlan::new(label, catalog.names(), runs))
}

fn ensure_samples(samples: usize) -> Result<(), DesignError> {
    if samples == 0 {
        return Err(DesignError::InvalidSampleCount { samples });
    }
    Ok(())
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
    fn empty_catalog_is_rejected_by_every_design() {
        let empty = FactorCatalog::new(Vec::new()).unwrap();
        let designs = [
            Design::FullFactorial,
            Design::LatinHypercube { samples: 8 },
            Design::SpaceFillingLhs {
                samples: 8,
                candidates: 5,
            },
            Design::PlackettBurman,
        ];
        for design in designs {
            assert_eq!(
                generate(&empty, &design, 42),
                Err(DesignError::EmptyCatalog),
                "{design:?}"
            );
        }
    }

    #[test]
    fn zero_samples_is_rejected() {
        assert_eq!(
            generate(&catalog(), &Design::LatinHypercube { samples: 0 }, 1),
            Err(DesignError::InvalidSampleCount { samples: 0 })
        );
    }

    #[test]
    fn identical_inputs_reproduce_the_plan_bit_for_bit() {
        let design = Design::LatinHypercube { samples: 8 };
        let first = generate(&catalog(), &design, 1234).unwrap();
        let second = generate(&catalog(), &design, 1234).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn different_seeds_change_stochastic_plans() {
        let design = Design::LatinHypercube { samples: 16 };
        let first = generate(&catalog(), &design, 1).unwrap();
        let second = generate(&catalog(), &design, 2).unwrap();
        assert_ne!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn plan_label_encodes_design_and_seed() {
        let plan = generate(&catalog(), &Design::FullFactorial, 0xBEEF).unwrap();
        assert_eq!(plan.label(), "fullfac_0000beef");
    }
}
