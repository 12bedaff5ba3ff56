//! Imported simulation models: engine kind plus sandboxed file location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The external simulation engines this crate can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    AnyLogic,
    AutoSchedAp,
    SimPy,
}

impl EngineKind {
    /// Human-readable engine name.
    pub fn label(&self) -> &'static str {
        match self {
            EngineKind::AnyLogic => "AnyLogic",
            EngineKind::AutoSchedAp => "AutoSched AP",
            EngineKind::SimPy => "SimPy",
        }
    }

    /// Model file extensions accepted at import.
    pub(crate) fn model_extensions(&self) -> &'static [&'static str] {
        match self {
            EngineKind::AnyLogic => &["jar", "alp"],
            EngineKind::AutoSchedAp => &["xmdx"],
            EngineKind::SimPy => &["py"],
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A resolved, sandboxed pointer to an imported simulation model.
///
/// Carries the three values downstream consumers need after import: the
/// engine kind, the sandbox folder and the sandboxed model path. The
/// original model file is never referenced again once the sandbox copy
/// exists. `default_arguments` is populated only for engines with a
/// self-describing parameter interface (SimPy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReference {
    pub engine: EngineKind,
    pub sandbox_dir: PathBuf,
    pub model_path: PathBuf,
    pub default_arguments: BTreeMap<String, String>,
}
