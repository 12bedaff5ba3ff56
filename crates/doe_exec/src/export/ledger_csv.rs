use doe_core::ExperimentPlan;

use crate::outcome::RunLedger;

pub(crate) fn export_impl(
    plan: &ExperimentPlan,
    ledger: &RunLedger,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    let mut header = vec![
        "run_index".to_string(),
        "configuration".to_string(),
        "status".to_string(),
        "result_location".to_string(),
        "failure_kind".to_string(),
        "failure_message".to_string(),
    ];
    header.extend(plan.factor_names().iter().cloned());
    wtr.write_record(&header)?;

    for outcome in ledger.outcomes() {
        let status = if outcome.succeeded() {
            "succeeded"
        } else {
            "failed"
        };
        let result_location = outcome
            .result_location()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        let (failure_kind, failure_message) = outcome
            .failure()
            .map(|detail| (detail.kind.label().to_string(), detail.message.clone()))
            .unwrap_or_default();

        let mut record = vec![
            outcome.run_index.to_string(),
            outcome.run_label.clone(),
            status.to_string(),
            result_location,
            failure_kind,
            failure_message,
        ];
        match plan.run(outcome.run_index) {
            Some(values) => record.extend(values.iter().map(|value| value.render())),
            None => {
                return Err(format!(
                    "ledger run index {} is not part of plan '{}'",
                    outcome.run_index,
                    plan.label()
                )
                .into())
            }
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
