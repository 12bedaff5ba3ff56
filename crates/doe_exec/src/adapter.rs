//! The uniform invocation contract every simulation engine must satisfy.
//!
//! An adapter translates one run's factor->value mapping into its engine's
//! native launch (command-line arguments, script arguments, IDE flags) and
//! reports back where the run's output artifact landed. The orchestrator
//! only ever talks to this trait; adding an engine means adding one adapter,
//! never touching the orchestrator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use doe_core::FactorValue;

use crate::model::EngineKind;

mod anylogic;
mod autosched;
mod simpy;

pub use anylogic::AnyLogicAdapter;
pub use autosched::AutoSchedAdapter;
pub use simpy::SimPyAdapter;

/// Everything an adapter needs to launch one run configuration.
#[derive(Debug)]
pub struct Invocation<'a> {
    /// 0-based index of the run within its plan.
    pub run_index: usize,
    /// Stable run label, `configuration_000000` style.
    pub run_label: &'a str,
    /// The sandboxed model file. Adapters treat it as read-only.
    pub model_path: &'a Path,
    /// Factor->value mapping for this run, in plan header order.
    pub parameters: &'a [(String, FactorValue)],
    /// Directory reserved for this run's artifacts; no other run writes here.
    pub output_dir: &'a Path,
    /// Optional wall-clock limit for the engine process.
    pub timeout: Option<Duration>,
}

/// Why a single run failed. Local to one run configuration; recorded in the
/// ledger rather than aborting the batch.
#[derive(Debug)]
pub enum ExecutionFailure {
    /// The engine process could not be started at all.
    Launch(std::io::Error),
    /// The engine started but exited unsuccessfully.
    NonZeroExit { code: Option<i32>, stderr: String },
    /// The engine exceeded the configured per-run time limit and was killed.
    TimedOut { limit: Duration },
    /// Sandbox or artifact I/O failed around the invocation.
    Io(std::io::Error),
}

impl std::fmt::Display for ExecutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionFailure::Launch(error) => write!(f, "failed to launch engine: {error}"),
            ExecutionFailure::NonZeroExit { code, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    write!(f, "engine exited with status {code}")
                } else {
                    write!(f, "engine exited with status {code}: {stderr}")
                }
            }
            ExecutionFailure::TimedOut { limit } => {
                write!(f, "engine exceeded time limit of {limit:?} and was killed")
            }
            ExecutionFailure::Io(error) => write!(f, "run I/O failed: {error}"),
        }
    }
}

impl std::error::Error for ExecutionFailure {}

/// Uniform capability required of every engine variant.
pub trait EngineAdapter: Send + Sync {
    /// The engine this adapter drives.
    fn engine(&self) -> EngineKind;

    /// Launch the model once with the given factor assignment.
    ///
    /// Returns the location of this run's output artifact on success. The
    /// call is synchronous from the orchestrator's point of view; adapters
    /// are free to shell out internally but must reap their subprocess on
    /// every exit path, including timeout.
    fn run(&self, invocation: &Invocation<'_>) -> Result<PathBuf, ExecutionFailure>;
}

/// Resolve the built-in adapter for an engine kind with default settings.
pub fn builtin_adapter(kind: EngineKind) -> Box<dyn EngineAdapter> {
    match kind {
        EngineKind::AnyLogic => Box::new(AnyLogicAdapter::new()),
        EngineKind::AutoSchedAp => Box::new(AutoSchedAdapter::new()),
        EngineKind::SimPy => Box::new(SimPyAdapter::new()),
    }
}
