//! Experiment plan: the ordered run configurations produced by a design.
//!
//! One plan holds the factor header (catalog order) and one total value
//! assignment per run. Two views are derived from the same sequence: a wide
//! view (one row per run, one column per factor) and a long view (one record
//! per run/factor pair). Converting wide to long and back is lossless, and
//! the 0-based run index is stable across both views so it can join run
//! outcomes later.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DesignError;
use crate::factor::FactorValue;

/// Ordered sequence of run configurations with a shared factor header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPlan {
    label: String,
    factors: Vec<String>,
    runs: Vec<Vec<FactorValue>>,
}

/// One wide-view row: a run index, its label and its values in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow<'a> {
    pub index: usize,
    pub label: String,
    pub values: &'a [FactorValue],
}

/// One long-view record: a single factor assignment within a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub run_index: usize,
    pub run_label: String,
    pub factor: String,
    pub value: FactorValue,
}

impl ExperimentPlan {
    pub(crate) fn new(label: String, factors: Vec<String>, runs: Vec<Vec<FactorValue>>) -> Self {
        debug_assert!(runs.iter().all(|run| run.len() == factors.len()));
        Self {
            label,
            factors,
            runs,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn factor_names(&self) -> &[String] {
        &self.factors
    }

    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The values of run `index` in header order.
    pub fn run(&self, index: usize) -> Option<&[FactorValue]> {
        self.runs.get(index).map(Vec::as_slice)
    }

    /// The value assigned to `factor` in run `index`.
    pub fn value(&self, index: usize, factor: &str) -> Option<&FactorValue> {
        let column = self.factors.iter().position(|name| name == factor)?;
        self.runs.get(index).map(|run| &run[column])
    }

    /// Stable per-run label, `configuration_000000` style.
    pub fn run_label(index: usize) -> String {
        format!("configuration_{index:06}")
    }

    /// Iterate the wide view in run-index order.
    pub fn wide_rows(&self) -> impl Iterator<Item = WideRow<'_>> {
        self.runs.iter().enumerate().map(|(index, values)| WideRow {
            index,
            label: Self::run_label(index),
            values,
        })
    }

    /// Iterate the long view: run-index order, header order within a run.
    pub fn long_records(&self) -> impl Iterator<Item = LongRecord> + '_ {
        self.runs.iter().enumerate().flat_map(move |(index, run)| {
            self.factors
                .iter()
                .zip(run.iter())
                .map(move |(factor, value)| LongRecord {
                    run_index: index,
                    run_label: Self::run_label(index),
                    factor: factor.clone(),
                    value: value.clone(),
                })
        })
    }

    /// Reassemble a plan from its long view.
    ///
    /// Records must arrive grouped by run index with a consistent factor
    /// order across runs, which is exactly what [`long_records`] emits.
    ///
    /// # Errors
    ///
    /// Returns `MalformedLongView` when runs disagree on the factor set or
    /// a run is missing an assignment.
    ///
    /// [`long_records`]: ExperimentPlan::long_records
    pub fn from_long(
        label: impl Into<String>,
        records: &[LongRecord],
    ) -> Result<Self, DesignError> {
        if records.is_empty() {
            return Ok(Self::new(label.into(), Vec::new(), Vec::new()));
        }

        let mut factors: Vec<String> = Vec::new();
        for record in records.iter().take_while(|r| r.run_index == records[0].run_index) {
            factors.push(record.factor.clone());
        }
        if factors.is_empty() {
            return Err(DesignError::MalformedLongView {
                detail: "first run has no factor assignments".to_string(),
            });
        }

        let mut runs: Vec<Vec<FactorValue>> = Vec::new();
        for chunk in records.chunks(factors.len()) {
            if chunk.len() != factors.len() {
                return Err(DesignError::MalformedLongView {
                    detail: format!(
                        "run {} has {} assignments, expected {}",
                        runs.len(),
                        chunk.len(),
                        factors.len()
                    ),
                });
            }
            let expected_index = runs.len();
            let mut values = Vec::with_capacity(factors.len());
            for (record, factor) in chunk.iter().zip(factors.iter()) {
                if record.run_index != expected_index || &record.factor != factor {
                    return Err(DesignError::MalformedLongView {
                        detail: format!(
                            "record for run {} factor '{}' found where run {} factor '{}' was expected",
                            record.run_index, record.factor, expected_index, factor
                        ),
                    });
                }
                values.push(record.value.clone());
            }
            runs.push(values);
        }

        Ok(Self::new(label.into(), factors, runs))
    }

    /// SHA-256 over the plan's stable JSON form. Identical catalog, design
    /// and seed produce an identical fingerprint.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("plan serialization should not fail");
        let mut hasher = Sha256::new();
        hasher.update(json);
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> ExperimentPlan {
        ExperimentPlan::new(
            "fullfac_test".to_string(),
            vec!["speed".to_string(), "mode".to_string()],
            vec![
                vec![
                    FactorValue::Number(1.0),
                    FactorValue::Text("fast".to_string()),
                ],
                vec![
                    FactorValue::Number(4.0),
                    FactorValue::Text("fast".to_string()),
                ],
                vec![
                    FactorValue::Number(1.0),
                    FactorValue::Text("slow".to_string()),
                ],
            ],
        )
    }

    #[test]
    fn wide_and_long_counts_agree() {
        let plan = sample_plan();
        let wide = plan.wide_rows().count();
        let long = plan.long_records().count();
        assert_eq!(wide, plan.run_count());
        assert_eq!(long, wide * plan.factor_count());
    }

    #[test]
    fn wide_long_wide_round_trip_is_exact() {
        let plan = sample_plan();
        let records: Vec<LongRecord> = plan.long_records().collect();
        let rebuilt = ExperimentPlan::from_long(plan.label(), &records).unwrap();
        assert_eq!(rebuilt, plan);
    }

    #[test]
    fn from_long_rejects_missing_assignment() {
        let plan = sample_plan();
        let mut records: Vec<LongRecord> = plan.long_records().collect();
        records.pop();
        let error = ExperimentPlan::from_long(plan.label(), &records)
            .expect_err("truncated view should fail");
        assert!(matches!(error, DesignError::MalformedLongView { .. }));
    }

    #[test]
    fn run_labels_are_zero_padded_and_stable() {
        assert_eq!(ExperimentPlan::run_label(0), "configuration_000000");
        assert_eq!(ExperimentPlan::run_label(41), "configuration_000041");
    }

    #[test]
    fn value_lookup_uses_header_order() {
        let plan = sample_plan();
        assert_eq!(plan.value(1, "speed"), Some(&FactorValue::Number(4.0)));
        assert_eq!(
            plan.value(2, "mode"),
            Some(&FactorValue::Text("slow".to_string()))
        );
        assert_eq!(plan.value(0, "missing"), None);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let plan = sample_plan();
        assert_eq!(plan.fingerprint(), sample_plan().fingerprint());

        let mut other = sample_plan();
        other.runs[0][0] = FactorValue::Number(7.0);
        assert_ne!(plan.fingerprint(), other.fingerprint());
    }
}
