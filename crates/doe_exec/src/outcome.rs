//! Per-run outcomes and the batch ledger.
//!
//! Every run configuration in a plan produces exactly one outcome, aligned
//! by run index, unless the batch was cut short (cancellation or fail-fast)
//! in which case the ledger reports itself incomplete and carries no entry
//! for runs that never started.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adapter::ExecutionFailure;

/// Broad class of a run failure, kept separate from the message so callers
/// can tell a timeout from an engine-reported error without parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The engine process never started.
    Launch,
    /// The engine ran and reported failure.
    EngineError,
    /// The run was killed at its time limit.
    Timeout,
    /// Sandbox or artifact I/O failed.
    Io,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Launch => "launch",
            FailureKind::EngineError => "engine_error",
            FailureKind::Timeout => "timeout",
            FailureKind::Io => "io",
        }
    }
}

/// What went wrong with one run, in ledger-storable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureDetail {
    pub(crate) fn from_failure(failure: &ExecutionFailure) -> Self {
        let kind = match failure {
            ExecutionFailure::Launch(_) => FailureKind::Launch,
            ExecutionFailure::NonZeroExit { .. } => FailureKind::EngineError,
            ExecutionFailure::TimedOut { .. } => FailureKind::Timeout,
            ExecutionFailure::Io(_) => FailureKind::Io,
        };
        Self {
            kind,
            message: failure.to_string(),
        }
    }
}

/// Terminal state of one run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunStatus {
    Succeeded { result_location: PathBuf },
    Failed { detail: FailureDetail },
}

/// One entry of the batch ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_index: usize,
    pub run_label: String,
    pub status: RunStatus,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, RunStatus::Succeeded { .. })
    }

    /// The run's output artifact, present iff the run succeeded.
    pub fn result_location(&self) -> Option<&Path> {
        match &self.status {
            RunStatus::Succeeded { result_location } => Some(result_location),
            RunStatus::Failed { .. } => None,
        }
    }

    /// The failure detail, present iff the run failed.
    pub fn failure(&self) -> Option<&FailureDetail> {
        match &self.status {
            RunStatus::Succeeded { .. } => None,
            RunStatus::Failed { detail } => Some(detail),
        }
    }
}

/// Ordered record of every run the batch executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLedger {
    plan_label: String,
    expected_runs: usize,
    outcomes: Vec<RunOutcome>,
}

impl RunLedger {
    pub(crate) fn new(
        plan_label: String,
        expected_runs: usize,
        outcomes: Vec<RunOutcome>,
    ) -> Self {
        Self {
            plan_label,
            expected_runs,
            outcomes,
        }
    }

    pub fn plan_label(&self) -> &str {
        &self.plan_label
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// False when the batch was cut short before every plan run produced an
    /// outcome; callers should treat a short ledger as a cancellation signal.
    pub fn is_complete(&self) -> bool {
        self.outcomes.len() == self.expected_runs
    }

    pub fn outcomes(&self) -> &[RunOutcome] {
        &self.outcomes
    }

    /// Look up the outcome for a plan run index.
    pub fn outcome(&self, run_index: usize) -> Option<&RunOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.run_index == run_index)
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn success(index: usize) -> RunOutcome {
        RunOutcome {
            run_index: index,
            run_label: format!("configuration_{index:06}"),
            status: RunStatus::Succeeded {
                result_location: PathBuf::from(format!("/runs/run_{index:06}/out.csv")),
            },
        }
    }

    #[test]
    fn failure_detail_classifies_timeouts() {
        let detail = FailureDetail::from_failure(&ExecutionFailure::TimedOut {
            limit: Duration::from_secs(10),
        });
        assert_eq!(detail.kind, FailureKind::Timeout);

        let detail = FailureDetail::from_failure(&ExecutionFailure::NonZeroExit {
            code: Some(1),
            stderr: "boom".to_string(),
        });
        assert_eq!(detail.kind, FailureKind::EngineError);
        assert!(detail.message.contains("boom"));
    }

    #[test]
    fn ledger_completeness_tracks_expected_runs() {
        let complete = RunLedger::new("plan".to_string(), 2, vec![success(0), success(1)]);
        assert!(complete.is_complete());

        let short = RunLedger::new("plan".to_string(), 5, vec![success(0), success(1)]);
        assert!(!short.is_complete());
        assert_eq!(short.len(), 2);
    }

    #[test]
    fn outcome_lookup_joins_by_run_index() {
        let ledger = RunLedger::new("plan".to_string(), 2, vec![success(0), success(1)]);
        assert!(ledger.outcome(1).is_some());
        assert!(ledger.outcome(7).is_none());
    }
}
