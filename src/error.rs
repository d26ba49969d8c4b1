//! Error types for stint
//!
//! This module defines the error types used throughout the stint library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Note that dirty data (unparseable record dates, malformed export lines)
//! is deliberately NOT an error: those are logged as data-quality events and
//! the offending records are skipped, so reports stay renderable. Only
//! unusable CLI arguments and I/O failures surface here.

use thiserror::Error;

/// Main error type for stint operations
#[derive(Error, Debug)]
pub enum StintError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No stint data directories found
    #[error("No stint data directories found")]
    NoDataDirectory,

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in stint
pub type Result<T> = std::result::Result<T, StintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = StintError::NoDataDirectory;
        assert_eq!(error.to_string(), "No stint data directories found");

        let error = StintError::InvalidDate("2024-13".to_string());
        assert_eq!(error.to_string(), "Invalid date format: 2024-13");

        let error = StintError::InvalidArgument("wibble".to_string());
        assert_eq!(error.to_string(), "Invalid argument: wibble");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let stint_error: StintError = io_error.into();
        assert!(matches!(stint_error, StintError::Io(_)));
    }
}
