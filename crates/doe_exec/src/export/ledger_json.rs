use crate::outcome::RunLedger;

pub(crate) fn export_impl(
    ledger: &RunLedger,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    serde_json::to_writer_pretty(file, ledger)?;
    Ok(())
}
