//! Error types for Depot Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid quota '{0}', supported formats: 90%, 500MB, 10GB")]
    InvalidQuota(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
