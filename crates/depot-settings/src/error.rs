//! Error types for the settings layer

use depot_parser::DirectiveError;
use thiserror::Error;

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while loading the configuration document
///
/// Every variant is fatal to the load; no part of a failing document is
/// ever applied.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Document is not valid YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Document could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Field holds a value of the wrong type or out of range
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Storage or proxy directive of a repository is invalid
    #[error("Invalid directive '{directive}' in repository '{repository}': {source}")]
    Directive {
        repository: String,
        directive: String,
        #[source]
        source: DirectiveError,
    },
}

impl SettingsError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Underlying directive error, if this is one
    pub fn directive_error(&self) -> Option<&DirectiveError> {
        match self {
            SettingsError::Directive { source, .. } => Some(source),
            _ => None,
        }
    }
}
