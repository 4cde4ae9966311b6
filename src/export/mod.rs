pub mod csv_export;
pub mod json_export;

use crate::alerts::AlertReport;
use crate::error::ExportError;
use std::io::Write;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unsupported format '{}'", other)),
        }
    }
}

/// Write a report to `out_path`, or to stdout when no path is given.
pub fn export_report<R: AlertReport>(
    report: &R,
    format: OutputFormat,
    out_path: Option<&str>,
) -> Result<(), ExportError> {
    match (format, out_path) {
        (OutputFormat::Json, Some(path)) => json_export::export_to_json(report, path),
        (OutputFormat::Csv, Some(path)) => csv_export::export_to_csv(report, path),
        (format, None) => {
            let stdout = std::io::stdout();
            let lock = stdout.lock();
            write_report(lock, report, format)
        }
    }
}

pub fn write_report<W: Write, R: AlertReport>(
    out: W,
    report: &R,
    format: OutputFormat,
) -> Result<(), ExportError> {
    match format {
        OutputFormat::Json => json_export::write_json(out, report),
        OutputFormat::Csv => csv_export::write_csv(out, report),
    }
}
