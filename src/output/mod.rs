//! Output writers for the aggregate artifact
//!
//! The accumulated result set is written once, at the end of a run, to a
//! single file under the output folder. The serialization format (structured
//! JSON or flattened CSV rows) is a configuration choice, not core behavior.

mod csv_output;
mod json;

pub use csv_output::CsvWriter;
pub use json::JsonWriter;

use crate::config::{OutputConfig, OutputFormat};
use crate::crawler::{DetailInfo, Record};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing the artifact
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes an accumulated result set to a persisted artifact
pub trait OutputWriter {
    fn write(&self, items: &[(Record, DetailInfo)], path: &Path) -> OutputResult<()>;
}

/// Selects the writer for the configured format
pub fn writer_for(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter),
        OutputFormat::Csv => Box::new(CsvWriter),
    }
}

/// Ensures the output folder exists and writes the artifact once
///
/// The write is a single non-atomic pass; there is no incremental flush
/// during the crawl. Returns the artifact path.
pub fn write_artifact(
    config: &OutputConfig,
    items: &[(Record, DetailInfo)],
) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(&config.folder)?;
    let path = Path::new(&config.folder).join(&config.file_name);
    writer_for(config.format).write(items, &path)?;
    Ok(path)
}
