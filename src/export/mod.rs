//! Export module for writing collected records to tabular files
//!
//! One scrape run produces one batch of records, exported as a pair of
//! timestamped files (CSV and XLSX) inside the configured output
//! directory. The column set is the union of every field name observed
//! across the batch, in first-seen order; a record missing a column gets
//! an empty cell.

mod csv_output;
mod table;
mod xlsx_output;

pub use csv_output::write_csv;
pub use table::column_union;
pub use xlsx_output::write_xlsx;

use crate::config::OutputConfig;
use crate::record::AdRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no records to export")]
    Empty,

    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Paths of the file pair written by one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
}

/// Writes the record batch to a timestamped CSV/XLSX file pair
///
/// The output directory is created if absent. Filenames carry the
/// configured prefix and a `%Y%m%d_%H%M%S` timestamp, so successive runs
/// never overwrite each other.
///
/// # Arguments
///
/// * `records` - The collected batch, in crawl order
/// * `config` - Output directory and filename prefix
///
/// # Returns
///
/// * `Ok(ExportedFiles)` - Both files written
/// * `Err(ExportError)` - Empty batch, or any write failure; an empty
///   batch creates neither directory nor files
pub fn save_records(records: &[AdRecord], config: &OutputConfig) -> ExportResult<ExportedFiles> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let columns = column_union(records);

    std::fs::create_dir_all(&config.data_dir).map_err(|source| ExportError::CreateDir {
        path: config.data_dir.clone(),
        source,
    })?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base_name = format!("{}_{timestamp}", config.filename_prefix);
    let data_dir = Path::new(&config.data_dir);
    let csv_path = data_dir.join(format!("{base_name}.csv"));
    let xlsx_path = data_dir.join(format!("{base_name}.xlsx"));

    write_csv(&csv_path, &columns, records)?;
    tracing::info!("Records written to: {}", csv_path.display());

    write_xlsx(&xlsx_path, &columns, records)?;
    tracing::info!("Records written to: {}", xlsx_path.display());

    Ok(ExportedFiles {
        csv: csv_path,
        xlsx: xlsx_path,
    })
}
