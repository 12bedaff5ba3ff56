//! AnyLogic adapter: IDE launch for `.alp` sources, sandbox launch script
//! for exported models.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapter::{EngineAdapter, ExecutionFailure, Invocation};
use crate::model::EngineKind;
use crate::process::run_command;

/// Drives AnyLogic models.
///
/// `.alp` project files need the AnyLogic IDE executable and are run with
/// `<ide> -r <model> Simulation`. Exported models ship a platform launch
/// script next to the model file; the adapter finds and runs it inside the
/// sandbox. Factor values reach the model through `DOE_FACTOR_<NAME>`
/// environment variables, and `DOE_RUN_OUTPUT` names the run's artifact
/// directory.
#[derive(Debug, Clone, Default)]
pub struct AnyLogicAdapter {
    ide_path: Option<PathBuf>,
}

impl AnyLogicAdapter {
    pub fn new() -> Self {
        Self { ide_path: None }
    }

    /// Configure the AnyLogic IDE executable used for `.alp` models.
    pub fn with_ide(mut self, ide_path: impl Into<PathBuf>) -> Self {
        self.ide_path = Some(ide_path.into());
        self
    }
}

impl EngineAdapter for AnyLogicAdapter {
    fn engine(&self) -> EngineKind {
        EngineKind::AnyLogic
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<PathBuf, ExecutionFailure> {
        let sandbox = invocation.model_path.parent().ok_or_else(|| {
            ExecutionFailure::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "model path has no parent directory",
            ))
        })?;

        let mut command = if invocation.model_path.extension().is_some_and(|ext| ext == "alp") {
            let ide = self.ide_path.as_ref().ok_or_else(|| {
                ExecutionFailure::Launch(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "AnyLogic IDE path is not configured for .alp models",
                ))
            })?;
            let mut command = std::process::Command::new(ide);
            command
                .arg("-r")
                .arg(invocation.model_path)
                .arg("Simulation");
            command
        } else {
            let script = find_launch_script(sandbox)?;
            let mut command = std::process::Command::new(script);
            command.current_dir(sandbox);
            command
        };

        for (name, value) in invocation.parameters {
            command.env(
                format!("DOE_FACTOR_{}", name.to_ascii_uppercase()),
                value.render(),
            );
        }
        command.env("DOE_RUN_OUTPUT", invocation.output_dir);
        info!(
            run = invocation.run_label,
            model = %invocation.model_path.display(),
            "launching AnyLogic model"
        );

        run_command(command, invocation.timeout)?;
        Ok(invocation.output_dir.to_path_buf())
    }
}

/// Locate the exported model's launch script inside the sandbox.
pub(crate) fn find_launch_script(sandbox: &Path) -> Result<PathBuf, ExecutionFailure> {
    let wanted = if cfg!(windows) { "bat" } else { "sh" };
    let mut entries: Vec<PathBuf> = std::fs::read_dir(sandbox)
        .map_err(ExecutionFailure::Io)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == wanted))
        .collect();
    entries.sort();
    entries.into_iter().next().ok_or_else(|| {
        ExecutionFailure::Launch(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no .{wanted} launch script found in sandbox"),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn launch_script_is_found_by_extension() {
        let sandbox = tempfile::tempdir().unwrap();
        std::fs::write(sandbox.path().join("model.jar"), b"jar").unwrap();
        std::fs::write(sandbox.path().join("run.sh"), b"#!/bin/sh\n").unwrap();

        let script = find_launch_script(sandbox.path()).unwrap();
        assert_eq!(script.file_name().unwrap(), "run.sh");
    }

    #[test]
    fn missing_launch_script_is_a_launch_failure() {
        let sandbox = tempfile::tempdir().unwrap();
        let failure = find_launch_script(sandbox.path()).expect_err("empty sandbox");
        assert!(matches!(failure, ExecutionFailure::Launch(_)));
    }

    #[test]
    fn alp_without_ide_is_a_launch_failure() {
        let sandbox = tempfile::tempdir().unwrap();
        let model = sandbox.path().join("model.alp");
        std::fs::write(&model, b"project").unwrap();

        let adapter = AnyLogicAdapter::new();
        let parameters = Vec::new();
        let invocation = Invocation {
            run_index: 0,
            run_label: "configuration_000000",
            model_path: &model,
            parameters: &parameters,
            output_dir: sandbox.path(),
            timeout: None,
        };
        let failure = adapter.run(&invocation).expect_err("no IDE configured");
        assert!(matches!(failure, ExecutionFailure::Launch(_)));
    }
}
