//! Scripted adapter for orchestrator tests and demos.
//!
//! Behaves like a real engine from the orchestrator's point of view:
//! writes one artifact per successful run into the run's output directory
//! and reports scripted failures for chosen run indices.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use crate::adapter::{EngineAdapter, ExecutionFailure, Invocation};
use crate::model::EngineKind;

/// An in-process engine with scripted per-run behavior.
pub struct StubAdapter {
    engine: EngineKind,
    fail_indices: HashSet<usize>,
    delay: Option<Duration>,
    invocations: Mutex<Vec<usize>>,
}

impl StubAdapter {
    /// An adapter that succeeds on every run.
    pub fn succeeding() -> Self {
        Self {
            engine: EngineKind::SimPy,
            fail_indices: HashSet::new(),
            delay: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// An adapter that fails exactly the given run indices.
    pub fn failing_on(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_indices: indices.into_iter().collect(),
            ..Self::succeeding()
        }
    }

    /// Sleep this long inside each run, to exercise concurrency paths.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Run indices in the order the orchestrator invoked them.
    pub fn invocation_order(&self) -> Vec<usize> {
        self.invocations
            .lock()
            .map(|order| order.clone())
            .unwrap_or_default()
    }
}

impl EngineAdapter for StubAdapter {
    fn engine(&self) -> EngineKind {
        self.engine
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<PathBuf, ExecutionFailure> {
        if let Ok(mut order) = self.invocations.lock() {
            order.push(invocation.run_index);
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.fail_indices.contains(&invocation.run_index) {
            return Err(ExecutionFailure::NonZeroExit {
                code: Some(1),
                stderr: format!("scripted failure for run {}", invocation.run_index),
            });
        }

        let artifact = invocation
            .output_dir
            .join(format!("{}.csv", invocation.run_label));
        let mut body = String::from("factor,value\n");
        for (name, value) in invocation.parameters {
            body.push_str(&format!("{name},{}\n", value.render()));
        }
        std::fs::write(&artifact, body).map_err(ExecutionFailure::Io)?;
        Ok(artifact)
    }
}
