//! CSV export for simulation step records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepRecord;

/// Column header for CSV export.
const HEADER: &str = "step,station,reported_soc_j,dispatch_w,applied_w,soc_after_j,plugged";

/// Exports step records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per station and step.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(records: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes step records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in records {
        wtr.write_record(&[
            r.step.to_string(),
            r.station.clone(),
            format!("{:.3}", r.reported_soc_j),
            format!("{:.4}", r.dispatch_w),
            format!("{:.4}", r.applied_w),
            format!("{:.3}", r.soc_after_j),
            r.plugged.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
