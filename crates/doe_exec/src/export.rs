//! Plan and ledger export.
//!
//! This module provides functions to export an experiment plan (wide and
//! long views) and a run ledger to CSV, and the ledger to JSON. The ledger
//! CSV joins each run's factor values by run index, so downstream consumers
//! get parameters, status and artifact location in one table.

use std::path::Path;

use doe_core::ExperimentPlan;

use crate::outcome::RunLedger;

mod ledger_csv;
mod ledger_json;
mod plan_csv;
mod writer_utils;

/// Export the plan's wide view: one row per run, one column per factor.
///
/// # Errors
///
/// Returns an error if the plan is empty or file creation/CSV writing fails.
pub fn export_plan_wide_csv(
    plan: &ExperimentPlan,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_plan_not_empty(plan)?;
    let file = writer_utils::create_output_file(path)?;
    plan_csv::export_wide_impl(plan, file)
}

/// Export the plan's long view: one row per (run, factor) assignment.
///
/// # Errors
///
/// Returns an error if the plan is empty or file creation/CSV writing fails.
pub fn export_plan_long_csv(
    plan: &ExperimentPlan,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_plan_not_empty(plan)?;
    let file = writer_utils::create_output_file(path)?;
    plan_csv::export_long_impl(plan, file)
}

/// Export the run ledger with the plan's factor values joined by run index.
///
/// # Errors
///
/// Returns an error if the ledger is empty, the ledger does not belong to
/// the plan, or file creation/CSV writing fails.
pub fn export_ledger_csv(
    plan: &ExperimentPlan,
    ledger: &RunLedger,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    writer_utils::ensure_not_empty(ledger.outcomes())?;
    let file = writer_utils::create_output_file(path)?;
    ledger_csv::export_impl(plan, ledger, file)
}

/// Export the run ledger as a JSON document.
///
/// # Errors
///
/// Returns an error if file creation or serialization fails.
pub fn export_ledger_json(
    ledger: &RunLedger,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = writer_utils::create_output_file(path)?;
    ledger_json::export_impl(ledger, file)
}
