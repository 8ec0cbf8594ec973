use crate::error::RpResult;
use crate::results::{column_headers, NormalizedRow};
use std::path::Path;

/// Writes the normalized table: one fixed header row, then one row per
/// layout with values taken verbatim from the row.
pub fn export_csv(records: &[NormalizedRow], output_file: &Path) -> RpResult<()> {
    let mut writer = ::csv::Writer::from_path(output_file)?;

    writer.write_record(column_headers())?;
    for record in records {
        writer.write_record(record.cells())?;
    }

    writer.flush()?;
    Ok(())
}
