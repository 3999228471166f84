//! Server error types

use depot_settings::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration document could not be loaded
    #[error("Failed to load settings from {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },

    /// Default configuration document could not be written
    #[error("Failed to write default settings to {path}: {source}")]
    WriteDefaults {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_display() {
        let err = ServerError::Settings {
            path: PathBuf::from("depot.yaml"),
            source: SettingsError::InvalidValue {
                field: "frontend".to_string(),
                message: "expected a boolean, got a list".to_string(),
            },
        };

        assert_eq!(
            err.to_string(),
            "Failed to load settings from depot.yaml: \
             Invalid value for field 'frontend': expected a boolean, got a list"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = ServerError::WriteDefaults {
            path: PathBuf::from("/read-only/depot.yaml"),
            source: SettingsError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
        };

        assert!(err.source().is_some());
    }
}
