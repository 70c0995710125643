use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output file already exists: {}", .0.display())]
    DuplicateFileExists(PathBuf),
    #[error("Transaction log and expected accounts would both be written to: {}", .0.display())]
    SharedOutputPath(PathBuf),
    #[error("Output I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Output CSV error: {0}")]
    Csv(#[from] csv::Error)
}
