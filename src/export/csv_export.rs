use crate::alerts::AlertReport;
use crate::error::ExportError;
use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Write `report` as CSV: one header row, then one row per entry.
pub fn write_csv<W: Write, R: AlertReport>(out: W, report: &R) -> Result<(), ExportError> {
    let mut w = WriterBuilder::new().from_writer(out);
    w.write_record(report.headers())?;
    for row in report.rows() {
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_to_csv<R: AlertReport>(report: &R, path: &str) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let buf_writer = BufWriter::with_capacity(64 * 1024, file);
    write_csv(buf_writer, report)
}
