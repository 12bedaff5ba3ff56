use std::fs::File;
use std::path::Path;

use doe_core::ExperimentPlan;

pub(crate) fn ensure_not_empty<T>(items: &[T]) -> Result<(), Box<dyn std::error::Error>> {
    if items.is_empty() {
        return Err("No results to export".into());
    }

    Ok(())
}

pub(crate) fn ensure_plan_not_empty(
    plan: &ExperimentPlan,
) -> Result<(), Box<dyn std::error::Error>> {
    if plan.is_empty() {
        return Err("No run configurations to export".into());
    }

    Ok(())
}

pub(crate) fn create_output_file(
    path: impl AsRef<Path>,
) -> Result<File, Box<dyn std::error::Error>> {
    Ok(File::create(path)?)
}
