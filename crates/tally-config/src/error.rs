//! Error types for tally-config

use thiserror::Error;

/// Error codes for configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// File not found
    FileNotFound,
    /// Invalid YAML format
    InvalidYaml,
    /// Invalid field value
    InvalidValue,
    /// IO error
    IoError,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ConfigErrorCode::InvalidYaml => write!(f, "INVALID_YAML"),
            ConfigErrorCode::InvalidValue => write!(f, "INVALID_VALUE"),
            ConfigErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid YAML format: {message}")]
    InvalidYaml { message: String },

    #[error("Invalid field value: {field} - {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cannot read config file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Get the error code
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
            ConfigError::IoError { .. } => ConfigErrorCode::IoError,
        }
    }

    /// Hints shown next to the error when the binary refuses to start
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::FileNotFound { .. } => vec![
                "Check if the config file path is correct.".to_string(),
                "Use --config flag to specify the config file path.".to_string(),
            ],
            ConfigError::InvalidValue { reason, .. } => vec![
                reason.clone(),
                "See templates/default_config.yaml for reference.".to_string(),
            ],
            ConfigError::InvalidYaml { .. } => {
                vec!["Check the YAML indentation and quoting.".to_string()]
            }
            ConfigError::IoError { .. } => {
                vec!["Check that the config file is readable.".to_string()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ConfigErrorCode::FileNotFound.to_string(), "FILE_NOT_FOUND");
        assert_eq!(ConfigErrorCode::InvalidValue.to_string(), "INVALID_VALUE");
    }

    #[test]
    fn test_suggestions() {
        let error = ConfigError::InvalidValue {
            field: "server.port".to_string(),
            reason: "Port must be greater than 0".to_string(),
        };
        let suggestions = error.suggestions();
        assert_eq!(suggestions[0], "Port must be greater than 0");

        let error = ConfigError::FileNotFound {
            path: "/etc/tally.yaml".to_string(),
        };
        assert!(error.to_string().contains("/etc/tally.yaml"));
        assert_eq!(error.suggestions().len(), 2);
    }
}
