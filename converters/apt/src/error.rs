//! Error types for the APT converter.

use std::path::PathBuf;

/// Errors that can occur during APT conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output path would be the same as input path.
    #[error("Output path cannot be the same as input path: {0}")]
    OutputPathSameAsInput(PathBuf),

    /// Parser error.
    #[error("Parser error: {0}")]
    Parser(#[from] aptdoc_parser::Error),
}
