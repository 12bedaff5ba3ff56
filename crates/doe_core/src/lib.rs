//! Experiment-design generation for simulation parameter studies.
//!
//! This crate turns declarative factor definitions into concrete run
//! configurations under four design strategies: full factorial, Latin
//! hypercube sampling, space-filling (maximin) LHS and Plackett-Burman
//! screening. Generation is pure: no I/O, no clocks, and stochastic designs
//! are fully reproducible from a seed.
//!
//! # Quick Start
//!
//! ```
//! use doe_core::{generate, Design, Factor, FactorCatalog};
//!
//! // Merge independently-defined factor sources into one catalog.
//! let catalog = FactorCatalog::from_sources([
//!     vec![Factor::numeric("speed", 1.0, 10.0, 3.0).unwrap()],
//!     vec![Factor::categorical("mode", ["fast", "slow"]).unwrap()],
//! ])
//! .unwrap();
//!
//! // 4 speed levels x 2 modes = 8 run configurations.
//! let plan = generate(&catalog, &Design::FullFactorial, 42).unwrap();
//! assert_eq!(plan.run_count(), 8);
//!
//! // The same plan is available wide (one row per run) and long
//! // (one record per run/factor assignment).
//! assert_eq!(plan.long_records().count(), 8 * 2);
//! ```
//!
//! # Architecture
//!
//! - [`factor`]: factor definitions and level realization
//! - [`catalog`]: merging factor sources into a name-unique catalog
//! - [`design`]: the four generation strategies
//! - [`plan`]: the wide/long dual-view experiment plan
//! - [`error`]: the configuration and resource-limit error taxonomy

pub mod catalog;
pub mod design;
pub mod error;
pub mod factor;
pub mod plan;

pub use catalog::FactorCatalog;
pub use design::{generate, Design, DEFAULT_MAXIMIN_CANDIDATES, MAX_FULL_FACTORIAL_RUNS};
pub use error::DesignError;
pub use factor::{Factor, FactorLevels, FactorValue};
pub use plan::{ExperimentPlan, LongRecord, WideRow};
