//! Repository level enums

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who can see and browse a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryVisibility {
    /// Listed and readable by everyone
    #[default]
    Public,
    /// Readable by everyone who knows the path, but not listed
    Hidden,
    /// Readable only with a valid access token
    Private,
}

impl RepositoryVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryVisibility::Public => "public",
            RepositoryVisibility::Hidden => "hidden",
            RepositoryVisibility::Private => "private",
        }
    }
}

impl fmt::Display for RepositoryVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryVisibility {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(RepositoryVisibility::Public),
            "hidden" => Ok(RepositoryVisibility::Hidden),
            "private" => Ok(RepositoryVisibility::Private),
            _ => Err(CoreError::UnknownVariant {
                kind: "visibility",
                value: s.to_string(),
                expected: "public, hidden, private",
            }),
        }
    }
}

/// Lifetime of an access token created through the directory service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTokenType {
    #[default]
    Persistent,
    Temporary,
}

impl AccessTokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTokenType::Persistent => "persistent",
            AccessTokenType::Temporary => "temporary",
        }
    }
}

impl fmt::Display for AccessTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTokenType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "persistent" => Ok(AccessTokenType::Persistent),
            "temporary" => Ok(AccessTokenType::Temporary),
            _ => Err(CoreError::UnknownVariant {
                kind: "token type",
                value: s.to_string(),
                expected: "persistent, temporary",
            }),
        }
    }
}
