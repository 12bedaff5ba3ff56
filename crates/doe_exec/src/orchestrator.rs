//! Batch execution of an experiment plan against one imported model.
//!
//! The orchestrator borrows the plan, invokes the engine adapter once per
//! run configuration and collects one outcome per run. A failing run is
//! recorded and the batch moves on unless fail-fast is set; the batch
//! itself only fails when the sandboxed model cannot be resolved before
//! any run starts. Runs may execute sequentially or on a bounded worker
//! pool, but the returned ledger is always ordered by run index.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{error, info, warn};

use doe_core::{ExperimentPlan, FactorValue};

use crate::adapter::{builtin_adapter, EngineAdapter, Invocation};
use crate::model::ModelReference;
use crate::outcome::{FailureDetail, FailureKind, RunLedger, RunOutcome, RunStatus};

/// Errors that fail the whole batch before or outside individual runs.
#[derive(Debug)]
pub enum ExecutionError {
    /// The sandboxed model file is gone; no run was started.
    ModelUnavailable { path: PathBuf },
    /// The per-plan output directory could not be prepared.
    Workspace(std::io::Error),
}

impl std::fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionError::ModelUnavailable { path } => {
                write!(f, "sandboxed model not found: {}", path.display())
            }
            ExecutionError::Workspace(error) => {
                write!(f, "failed to prepare run workspace: {error}")
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Cooperative cancellation flag shared between the caller and the batch.
///
/// Cancelling stops new runs from being scheduled; in-flight invocations
/// finish and keep their outcomes. Runs that never started are simply
/// absent from the ledger.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Batch execution settings.
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Stop scheduling new runs after the first failure.
    pub fail_fast: bool,
    /// Wall-clock limit applied to each engine invocation.
    pub run_timeout: Option<Duration>,
    /// Worker pool size; `None` runs the batch sequentially.
    pub worker_threads: Option<usize>,
    /// Display a progress bar while the batch runs.
    pub show_progress: bool,
    /// Root directory for per-plan, per-run output folders.
    pub output_root: PathBuf,
}

impl ExecutionOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            fail_fast: false,
            run_timeout: None,
            worker_threads: None,
            show_progress: false,
            output_root: output_root.into(),
        }
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn worker_threads(mut self, threads: Option<usize>) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

struct RunInput {
    index: usize,
    label: String,
    parameters: Vec<(String, FactorValue)>,
    run_dir: PathBuf,
}

/// Drives one experiment plan through an engine adapter, one invocation per
/// run configuration.
pub struct ExecutionOrchestrator {
    options: ExecutionOptions,
}

impl ExecutionOrchestrator {
    pub fn new(options: ExecutionOptions) -> Self {
        Self { options }
    }

    /// Execute the plan with the built-in adapter for the model's engine.
    pub fn execute(
        &self,
        model: &ModelReference,
        plan: &ExperimentPlan,
    ) -> Result<RunLedger, ExecutionError> {
        let adapter = builtin_adapter(model.engine);
        self.execute_with_adapter(adapter.as_ref(), model, plan)
    }

    /// Execute the plan with a caller-supplied adapter. This is the seam
    /// through which new engines (and test stubs) plug in.
    pub fn execute_with_adapter(
        &self,
        adapter: &dyn EngineAdapter,
        model: &ModelReference,
        plan: &ExperimentPlan,
    ) -> Result<RunLedger, ExecutionError> {
        self.execute_cancellable(adapter, model, plan, &CancellationToken::new())
    }

    /// Execute the plan, honoring a caller-held cancellation token.
    pub fn execute_cancellable(
        &self,
        adapter: &dyn EngineAdapter,
        model: &ModelReference,
        plan: &ExperimentPlan,
        token: &CancellationToken,
    ) -> Result<RunLedger, ExecutionError> {
        if !model.model_path.is_file() {
            error!(model = %model.model_path.display(), "sandboxed model missing");
            return Err(ExecutionError::ModelUnavailable {
                path: model.model_path.clone(),
            });
        }

        let plan_dir = self.options.output_root.join(plan.label());
        std::fs::create_dir_all(&plan_dir).map_err(ExecutionError::Workspace)?;

        let names = plan.factor_names();
        let inputs: Vec<RunInput> = plan
            .wide_rows()
            .map(|row| RunInput {
                index: row.index,
                label: row.label,
                parameters: names
                    .iter()
                    .cloned()
                    .zip(row.values.iter().cloned())
                    .collect(),
                run_dir: plan_dir.join(format!("run_{:06}", row.index)),
            })
            .collect();

        info!(
            plan = plan.label(),
            runs = inputs.len(),
            engine = %model.engine,
            "starting experiment batch"
        );

        let progress = self.progress_bar(inputs.len());
        let stop = AtomicBool::new(false);

        let mut outcomes: Vec<RunOutcome> = match self.options.worker_threads {
            None => {
                let mut recorded = Vec::with_capacity(inputs.len());
                for input in &inputs {
                    if token.is_cancelled() || stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let outcome = self.execute_run(adapter, model, input);
                    if self.options.fail_fast && !outcome.succeeded() {
                        stop.store(true, Ordering::SeqCst);
                    }
                    recorded.push(outcome);
                    if let Some(ref bar) = progress {
                        bar.inc(1);
                    }
                }
                recorded
            }
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .expect("Failed to create thread pool");

                let progress_clone = progress.clone();
                let collected: Vec<Option<RunOutcome>> = pool.install(|| {
                    inputs
                        .par_iter()
                        .map(|input| {
                            if token.is_cancelled() || stop.load(Ordering::SeqCst) {
                                return None;
                            }
                            let outcome = self.execute_run(adapter, model, input);
                            if self.options.fail_fast && !outcome.succeeded() {
                                stop.store(true, Ordering::SeqCst);
                            }
                            if let Some(ref bar) = progress_clone {
                                bar.inc(1);
                            }
                            Some(outcome)
                        })
                        .collect()
                });
                collected.into_iter().flatten().collect()
            }
        };

        if let Some(ref bar) = progress {
            bar.finish_with_message("Completed");
        }

        outcomes.sort_by_key(|outcome| outcome.run_index);
        let ledger = RunLedger::new(plan.label().to_string(), plan.run_count(), outcomes);
        info!(
            plan = plan.label(),
            succeeded = ledger.succeeded_count(),
            failed = ledger.failed_count(),
            complete = ledger.is_complete(),
            "experiment batch finished"
        );
        Ok(ledger)
    }

    fn execute_run(
        &self,
        adapter: &dyn EngineAdapter,
        model: &ModelReference,
        input: &RunInput,
    ) -> RunOutcome {
        if let Err(io_error) = std::fs::create_dir_all(&input.run_dir) {
            return RunOutcome {
                run_index: input.index,
                run_label: input.label.clone(),
                status: RunStatus::Failed {
                    detail: FailureDetail {
                        kind: FailureKind::Io,
                        message: format!("failed to create run directory: {io_error}"),
                    },
                },
            };
        }

        let invocation = Invocation {
            run_index: input.index,
            run_label: &input.label,
            model_path: &model.model_path,
            parameters: &input.parameters,
            output_dir: &input.run_dir,
            timeout: self.options.run_timeout,
        };
        info!(run = %input.label, "launching run configuration");

        match adapter.run(&invocation) {
            Ok(result_location) => RunOutcome {
                run_index: input.index,
                run_label: input.label.clone(),
                status: RunStatus::Succeeded { result_location },
            },
            Err(failure) => {
                warn!(run = %input.label, error = %failure, "simulation run failed");
                RunOutcome {
                    run_index: input.index,
                    run_label: input.label.clone(),
                    status: RunStatus::Failed {
                        detail: FailureDetail::from_failure(&failure),
                    },
                }
            }
        }
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.options.show_progress || total == 0 {
            return None;
        }
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    }
}
