//! Sandbox import: copy a model into an isolated workspace folder.
//!
//! Imports create one sandbox directory per model, copy the model's folder
//! contents into it and hand back a [`ModelReference`] pointing at the
//! sandboxed copy. The original file is validated once and never touched
//! again, so the workflow stays portable and engine runs cannot mutate the
//! source. SimPy models additionally expose their parameter interface
//! through `--help`, which the import probes to build the default-argument
//! table.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use tracing::info;

use crate::adapter::ExecutionFailure;
use crate::model::{EngineKind, ModelReference};
use crate::process::run_command;

/// Errors raised while importing a model into its sandbox.
#[derive(Debug)]
pub enum ImportError {
    /// The source model file does not exist.
    MissingModel { path: std::path::PathBuf },
    /// The source file extension does not match the engine's model format.
    UnsupportedExtension {
        path: std::path::PathBuf,
        expected: &'static [&'static str],
    },
    /// Creating or populating the sandbox failed.
    Io(std::io::Error),
    /// The SimPy `--help` probe failed.
    HelpProbe(ExecutionFailure),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::MissingModel { path } => {
                write!(f, "model file not found: {}", path.display())
            }
            ImportError::UnsupportedExtension { path, expected } => write!(
                f,
                "model file {} does not match expected extension(s) {}",
                path.display(),
                expected.join(", ")
            ),
            ImportError::Io(error) => write!(f, "sandbox I/O failed: {error}"),
            ImportError::HelpProbe(failure) => {
                write!(f, "SimPy argument discovery failed: {failure}")
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(error: std::io::Error) -> Self {
        ImportError::Io(error)
    }
}

/// Import a model file into a fresh sandbox under `workspace_root`.
///
/// The sandbox directory is named after the model file stem, cleared if it
/// already exists, and filled with a copy of the model's directory contents
/// so companion resources travel with the model. For SimPy models the
/// sandboxed script is probed with `--help` to recover the
/// (argument, default) table.
///
/// # Errors
///
/// `MissingModel` / `UnsupportedExtension` for a bad source path, `Io` when
/// the sandbox cannot be created or populated, `HelpProbe` when the SimPy
/// interface probe fails.
pub fn import_model(
    source: &Path,
    workspace_root: &Path,
    engine: EngineKind,
) -> Result<ModelReference, ImportError> {
    if !source.is_file() {
        return Err(ImportError::MissingModel {
            path: source.to_path_buf(),
        });
    }

    let expected = engine.model_extensions();
    let extension = source
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    if !extension.is_some_and(|ext| expected.contains(&ext.as_str())) {
        return Err(ImportError::UnsupportedExtension {
            path: source.to_path_buf(),
            expected,
        });
    }

    let file_name = source.file_name().ok_or_else(|| ImportError::MissingModel {
        path: source.to_path_buf(),
    })?;
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "model".to_string());

    let sandbox_dir = workspace_root.join(format!("sandbox_{stem}"));
    if sandbox_dir.exists() {
        std::fs::remove_dir_all(&sandbox_dir)?;
    }
    std::fs::create_dir_all(&sandbox_dir)?;

    // Copy the whole model folder so companion files travel with the model.
    if let Some(model_dir) = source.parent() {
        copy_dir_contents(model_dir, &sandbox_dir)?;
    }

    let model_path = sandbox_dir.join(file_name);
    let default_arguments = match engine {
        EngineKind::SimPy => discover_simpy_defaults(&model_path)?,
        _ => BTreeMap::new(),
    };

    info!(
        engine = %engine,
        sandbox = %sandbox_dir.display(),
        model = %model_path.display(),
        "imported simulation model"
    );

    Ok(ModelReference {
        engine,
        sandbox_dir,
        model_path,
        default_arguments,
    })
}

fn copy_dir_contents(source: &Path, target: &Path) -> Result<(), std::io::Error> {
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let destination = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&destination)?;
            copy_dir_contents(&entry.path(), &destination)?;
        } else {
            std::fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

/// Run the sandboxed SimPy script with `--help` and parse its defaults.
fn discover_simpy_defaults(model_path: &Path) -> Result<BTreeMap<String, String>, ImportError> {
    let mut command = std::process::Command::new("python");
    command.arg(model_path).arg("--help");
    let output = run_command(command, None).map_err(ImportError::HelpProbe)?;
    // argparse prints help on stdout, but fall back to stderr like the
    // interpreter does for usage errors
    let help_text = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    Ok(parse_help_defaults(help_text))
}

/// Extract `(argument, default)` pairs from argparse-style help output.
///
/// Only lines below the `options:` section are considered; wrapped
/// continuation lines are merged into their option line first, then each
/// option matching `--name ... (default: value)` contributes one entry.
pub(crate) fn parse_help_defaults(help_text: &str) -> BTreeMap<String, String> {
    let lines: Vec<&str> = help_text.lines().collect();
    let option_lines: &[&str] = match lines
        .iter()
        .position(|line| line.trim().eq_ignore_ascii_case("options:"))
    {
        Some(index) => &lines[index + 1..],
        None => &lines,
    };

    let mut merged: Vec<String> = Vec::new();
    for line in option_lines {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            merged.push(trimmed.to_string());
        } else if let Some(current) = merged.last_mut() {
            if !trimmed.is_empty() {
                current.push(' ');
                current.push_str(trimmed);
            }
        }
    }

    let pattern = Regex::new(r"--([\w\-]+)[^\n]*\(default:\s*([^)]+)\)")
        .expect("help-default pattern is valid");
    let mut defaults = BTreeMap::new();
    for line in &merged {
        if let Some(captures) = pattern.captures(line) {
            defaults.insert(
                captures[1].to_string(),
                captures[2].trim().to_string(),
            );
        }
    }
    defaults
}
