//! Directive error types

use thiserror::Error;

/// Directive parsing error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    /// First token of a storage directive is not a known provider
    #[error("Unknown storage provider '{0}', supported providers: fs, s3")]
    UnknownStorageProvider(String),

    /// Flag not declared by the directive
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    /// Value flag given without its value
    #[error("Missing value for flag: {0}")]
    MissingFlagValue(String),

    /// Required positional parameter not given
    #[error("Missing required parameter: <{0}>")]
    MissingParameter(String),

    /// Flag value of the wrong type
    #[error("Invalid value '{value}' for flag '{flag}': {message}")]
    InvalidFlagValue {
        flag: String,
        value: String,
        message: String,
    },

    /// Quota that is neither a percentage nor a size
    #[error("Invalid quota format '{0}', supported formats: 90%, 500MB, 10GB")]
    InvalidQuotaFormat(String),

    /// Quote opened but never closed
    #[error("Unterminated quote in: {0}")]
    UnterminatedQuote(String),

    /// Positional token the directive has no parameter for
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// Result type for directive parsing
pub type Result<T> = std::result::Result<T, DirectiveError>;
