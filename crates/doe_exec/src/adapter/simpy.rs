//! SimPy adapter: runs a Python simulation script with `--name value` pairs.

use std::path::PathBuf;

use tracing::info;

use crate::adapter::{EngineAdapter, ExecutionFailure, Invocation};
use crate::model::EngineKind;
use crate::process::run_command;

const OUTPUT_EXTENSIONS: &[&str] = &[".csv", ".txt"];

/// Drives `python <model> --factor value ...` per run.
#[derive(Debug, Clone)]
pub struct SimPyAdapter {
    python: String,
}

impl SimPyAdapter {
    pub fn new() -> Self {
        Self {
            python: "python".to_string(),
        }
    }

    /// Override the Python interpreter used to launch models.
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub(crate) fn python(&self) -> &str {
        &self.python
    }
}

impl Default for SimPyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineAdapter for SimPyAdapter {
    fn engine(&self) -> EngineKind {
        EngineKind::SimPy
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<PathBuf, ExecutionFailure> {
        let (arguments, output_path) = build_arguments(invocation);

        let mut command = std::process::Command::new(&self.python);
        command.arg(invocation.model_path).args(&arguments);
        info!(
            run = invocation.run_label,
            model = %invocation.model_path.display(),
            "launching SimPy model"
        );

        run_command(command, invocation.timeout)?;
        Ok(output_path)
    }
}

/// Translate the factor mapping into script arguments.
///
/// Every factor becomes a `--name value` pair with whole numbers rendered
/// without a fractional part. A factor named `output` with a `.csv`/`.txt`
/// value is rebased into the run's output directory; otherwise an
/// `--output <run_label>.csv` fallback is appended so each run writes to a
/// distinct artifact.
pub(crate) fn build_arguments(invocation: &Invocation<'_>) -> (Vec<String>, PathBuf) {
    let mut arguments = Vec::new();
    let mut output_path = None;

    for (name, value) in invocation.parameters {
        if name.eq_ignore_ascii_case("output") {
            let rendered = value.render();
            let lowered = rendered.to_ascii_lowercase();
            if OUTPUT_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext)) {
                let file_name = std::path::Path::new(&rendered)
                    .file_name()
                    .map(|name| name.to_os_string())
                    .unwrap_or_else(|| rendered.clone().into());
                let path = invocation.output_dir.join(file_name);
                arguments.push("--output".to_string());
                arguments.push(path.display().to_string());
                output_path = Some(path);
            }
            // invalid output entries are skipped, not forwarded
            continue;
        }
        arguments.push(format!("--{name}"));
        arguments.push(value.render());
    }

    let output_path = output_path.unwrap_or_else(|| {
        let path = invocation
            .output_dir
            .join(format!("{}.csv", invocation.run_label));
        arguments.push("--output".to_string());
        arguments.push(path.display().to_string());
        path
    });

    (arguments, output_path)
}
