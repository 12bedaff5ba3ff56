//! AutoSched AP adapter: `asap -d<days> <model-name>` in the sandbox.

use std::path::PathBuf;

use tracing::info;

use doe_core::FactorValue;

use crate::adapter::{EngineAdapter, ExecutionFailure, Invocation};
use crate::model::EngineKind;
use crate::process::run_command;

const DEFAULT_DAYS: &str = "1";

/// Drives the AutoSched AP command-line interface.
///
/// The simulated horizon comes from a factor named `days` when the plan
/// carries one, falling back to the adapter's configured default. The CLI
/// addresses the model by name, not path, and resolves it from the working
/// directory, so invocations run inside the sandbox.
#[derive(Debug, Clone)]
pub struct AutoSchedAdapter {
    default_days: String,
}

impl AutoSchedAdapter {
    pub fn new() -> Self {
        Self {
            default_days: DEFAULT_DAYS.to_string(),
        }
    }

    /// Override the horizon used when no `days` factor is present.
    pub fn with_default_days(mut self, days: u32) -> Self {
        self.default_days = days.to_string();
        self
    }
}

impl Default for AutoSchedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineAdapter for AutoSchedAdapter {
    fn engine(&self) -> EngineKind {
        EngineKind::AutoSchedAp
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<PathBuf, ExecutionFailure> {
        let model_name = invocation
            .model_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| {
                ExecutionFailure::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "model path has no file name",
                ))
            })?;
        let sandbox = invocation.model_path.parent().ok_or_else(|| {
            ExecutionFailure::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "model path has no parent directory",
            ))
        })?;

        let days = resolve_days(invocation.parameters, &self.default_days);
        let mut command = std::process::Command::new("asap");
        command
            .arg(format!("-d{days}"))
            .arg(&model_name)
            .current_dir(sandbox);
        info!(
            run = invocation.run_label,
            model = %model_name,
            days = %days,
            "launching AutoSched AP model"
        );

        let output = run_command(command, invocation.timeout)?;

        // The CLI reports through stdout; persist it as the run artifact.
        let log_path = invocation
            .output_dir
            .join(format!("{}.log", invocation.run_label));
        std::fs::write(&log_path, output.stdout).map_err(ExecutionFailure::Io)?;
        Ok(log_path)
    }
}

pub(crate) fn resolve_days<'a>(
    parameters: &'a [(String, FactorValue)],
    default_days: &'a str,
) -> String {
    parameters
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("days"))
        .map(|(_, value)| value.render())
        .unwrap_or_else(|| default_days.to_string())
}
