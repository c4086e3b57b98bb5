//! CSV extract writer for downstream reporting.

use std::path::PathBuf;

use closura_application::ReportWriter;
use closura_core::{AppError, AppResult};
use closura_domain::CsvColumn;

/// Writes the per-record extract to the configured CSV path.
#[derive(Clone)]
pub struct CsvReportWriter {
    path: PathBuf,
}

impl CsvReportWriter {
    /// Creates a writer targeting the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ReportWriter for CsvReportWriter {
    fn write_extract(&self, header: &[CsvColumn], rows: &[Vec<String>]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                AppError::Report(format!(
                    "failed to create output directory {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let mut writer = csv::Writer::from_path(&self.path).map_err(|error| {
            AppError::Report(format!(
                "failed to create CSV extract {}: {error}",
                self.path.display()
            ))
        })?;

        writer
            .write_record(header.iter().map(CsvColumn::as_str))
            .map_err(|error| AppError::Report(format!("failed to write CSV header: {error}")))?;
        for row in rows {
            writer
                .write_record(row)
                .map_err(|error| AppError::Report(format!("failed to write CSV row: {error}")))?;
        }

        writer
            .flush()
            .map_err(|error| AppError::Report(format!("failed to flush CSV extract: {error}")))?;

        Ok(())
    }
}
