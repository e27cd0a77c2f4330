//! XLSX boundary error types

use thiserror::Error as ThisError;

/// Result type for XLSX operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing workbooks
#[derive(Debug, ThisError)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input workbook could not be opened or read
    #[error("workbook read error: {0}")]
    Read(#[from] calamine::XlsxError),

    /// Output workbook could not be assembled or saved
    #[error("workbook write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}
