//! Execution of experiment plans against external simulation engines.
//!
//! This crate takes an [`ExperimentPlan`](doe_core::ExperimentPlan) from
//! `doe_core`, pairs it with a sandboxed [`ModelReference`] and drives the
//! matching engine adapter once per run configuration. Runs fail
//! individually: the batch records each failure in its ledger and keeps
//! going unless fail-fast is requested.
//!
//! # Quick Start
//!
//! ```no_run
//! use doe_core::{generate, Design, Factor, FactorCatalog};
//! use doe_exec::{import_model, EngineKind, ExecutionOptions, ExecutionOrchestrator};
//! use std::path::Path;
//!
//! // Sandbox the model; the original file is never touched again.
//! let model = import_model(
//!     Path::new("models/queue.py"),
//!     Path::new("workspace"),
//!     EngineKind::SimPy,
//! )
//! .unwrap();
//!
//! // Generate a plan and run it, one engine invocation per configuration.
//! let catalog = FactorCatalog::from_sources([
//!     vec![Factor::numeric("customers", 5.0, 20.0, 5.0).unwrap()],
//!     vec![Factor::numeric("capacity", 1.0, 3.0, 1.0).unwrap()],
//! ])
//! .unwrap();
//! let plan = generate(&catalog, &Design::FullFactorial, 42).unwrap();
//!
//! let orchestrator = ExecutionOrchestrator::new(ExecutionOptions::new("workspace/runs"));
//! let ledger = orchestrator.execute(&model, &plan).unwrap();
//! assert_eq!(ledger.len(), plan.run_count());
//! ```
//!
//! # Architecture
//!
//! - [`model`]: engine kinds and sandboxed model references
//! - [`sandbox`]: model import with workspace isolation
//! - [`adapter`]: the uniform engine invocation contract and built-in
//!   adapters (AnyLogic, AutoSched AP, SimPy)
//! - [`orchestrator`]: sequential or pooled batch execution with
//!   partial-failure, timeout and cancellation handling
//! - [`outcome`]: per-run outcomes and the index-aligned ledger
//! - [`export`]: plan and ledger export to CSV/JSON

pub mod adapter;
pub mod export;
pub mod model;
pub mod orchestrator;
pub mod outcome;
mod process;
pub mod sandbox;

#[cfg(any(test, feature = "test-helpers"))]
pub mod stub;

pub use adapter::{
    builtin_adapter, AnyLogicAdapter, AutoSchedAdapter, EngineAdapter, ExecutionFailure,
    Invocation, SimPyAdapter,
};
pub use export::{
    export_ledger_csv, export_ledger_json, export_plan_long_csv, export_plan_wide_csv,
};
pub use model::{EngineKind, ModelReference};
pub use orchestrator::{
    CancellationToken, ExecutionError, ExecutionOptions, ExecutionOrchestrator,
};
pub use outcome::{FailureDetail, FailureKind, RunLedger, RunOutcome, RunStatus};
pub use sandbox::{import_model, ImportError};

#[cfg(any(test, feature = "test-helpers"))]
pub use stub::StubAdapter;
