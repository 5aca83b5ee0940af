//! Error types for tally-core
//!
//! Every variant is fatal to the report job that raised it. Malformed
//! ledger lines never get here; the parser turns them into zero amounts.

use tally_parser::ParseError;
use thiserror::Error;

use crate::types::ReportKind;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input directory could not be listed
    InputUnavailable,
    /// A ledger file could not be read
    ReadError,
    /// Report output could not be written
    WriteError,
    /// Job exceeded its configured timeout
    Timeout,
    /// A report total left the decimal range
    Overflow,
    /// The job task died before finishing
    Aborted,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InputUnavailable => write!(f, "INPUT_UNAVAILABLE"),
            ErrorCode::ReadError => write!(f, "READ_ERROR"),
            ErrorCode::WriteError => write!(f, "WRITE_ERROR"),
            ErrorCode::Timeout => write!(f, "TIMEOUT"),
            ErrorCode::Overflow => write!(f, "OVERFLOW"),
            ErrorCode::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning - retrying later may succeed
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for tally-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Read(#[from] ParseError),

    #[error("Cannot write report {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Report {job} timed out after {seconds}s")]
    Timeout { job: ReportKind, seconds: u64 },

    #[error("Report {job} overflowed while totalling '{key}'")]
    Overflow { job: ReportKind, key: String },

    #[error("Report {job} aborted: {message}")]
    Aborted { job: ReportKind, message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Read(ParseError::ListDir { .. }) => ErrorCode::InputUnavailable,
            CoreError::Read(ParseError::ReadFile { .. }) => ErrorCode::ReadError,
            CoreError::WriteFailed { .. } => ErrorCode::WriteError,
            CoreError::Timeout { .. } => ErrorCode::Timeout,
            CoreError::Overflow { .. } => ErrorCode::Overflow,
            CoreError::Aborted { .. } => ErrorCode::Aborted,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Read(_) => ErrorSeverity::Error,
            CoreError::WriteFailed { .. } => ErrorSeverity::Error,
            CoreError::Timeout { .. } => ErrorSeverity::Warning,
            CoreError::Overflow { .. } => ErrorSeverity::Error,
            CoreError::Aborted { .. } => ErrorSeverity::Error,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InputUnavailable.to_string(), "INPUT_UNAVAILABLE");
        assert_eq!(ErrorCode::WriteError.to_string(), "WRITE_ERROR");
    }

    #[test]
    fn test_read_errors_keep_parser_message() {
        let error: CoreError = ParseError::ListDir {
            path: PathBuf::from("/ledgers"),
            source: io::Error::new(io::ErrorKind::NotFound, "Directory not found"),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::InputUnavailable);
        assert!(error.to_string().contains("Directory not found"));
        assert!(error.to_string().contains("/ledgers"));

        let error: CoreError = ParseError::ReadFile {
            path: PathBuf::from("/ledgers/a.csv"),
            source: io::Error::new(io::ErrorKind::Other, "File read error"),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::ReadError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_timeout_error() {
        let error = CoreError::Timeout {
            job: ReportKind::Yearly,
            seconds: 5,
        };
        assert_eq!(error.to_string(), "Report yearly timed out after 5s");
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }
}
