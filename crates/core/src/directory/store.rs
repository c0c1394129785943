//! Durable CSV storage for the clinic directory.

use std::path::{Path, PathBuf};

use crate::Error;
use crate::directory::record::{CSV_HEADER, ClinicRecord};

/// Adapter over the clinic CSV file: read-all on load, full rewrite on
/// persist. Row-level problems are logged and skipped; only I/O-level
/// failures surface as errors.
#[derive(Debug, Clone)]
pub struct ClinicStore {
    path: PathBuf,
}

impl ClinicStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every usable row, skipping the header. Short or unreadable rows
    /// are dropped with a warning; they never fail the load.
    pub fn read_all(&self) -> Result<Vec<ClinicRecord>, Error> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_path(&self.path)?;

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            // Line numbers are 1-based and the header occupies line 1.
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!(line, error = %e, "skipping unreadable clinic row");
                    continue;
                }
            };
            match ClinicRecord::from_csv_row(&row) {
                Some(record) => records.push(record),
                None => tracing::warn!(line, fields = row.len(), "skipping short clinic row"),
            }
        }

        Ok(records)
    }

    /// Replace the whole file with the given records, header included.
    pub fn write_all(&self, records: &[ClinicRecord]) -> Result<(), Error> {
        let mut writer = csv::WriterBuilder::new().from_path(&self.path)?;
        writer.write_record(CSV_HEADER)?;
        for record in records {
            writer.write_record(record.to_csv_row())?;
        }
        writer.flush()?;
        Ok(())
    }
}
