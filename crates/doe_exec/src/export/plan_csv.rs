use doe_core::ExperimentPlan;

pub(crate) fn export_wide_impl(
    plan: &ExperimentPlan,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    let mut header = vec!["experiment".to_string(), "configuration".to_string()];
    header.extend(plan.factor_names().iter().cloned());
    wtr.write_record(&header)?;

    for row in plan.wide_rows() {
        let mut record = vec![plan.label().to_string(), row.label];
        record.extend(row.values.iter().map(|value| value.render()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_long_impl(
    plan: &ExperimentPlan,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(["experiment", "configuration", "factor", "value"])?;
    for record in plan.long_records() {
        wtr.write_record([
            plan.label(),
            &record.run_label,
            &record.factor,
            &record.value.render(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
