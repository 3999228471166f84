//! Directive AST
//!
//! Typed results of parsing the single-line storage and proxy directives
//! found in repository settings, e.g.:
//! - `fs --quota 50GB --mount /mnt/releases`
//! - `s3 bucket-name --endpoint custom.endpoint.com --region eu-west-1`
//! - `https://repo.maven.apache.org/maven2 --store --allow=org.apache`
//! - `releases` (a local alias)

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default quota of the file system provider
pub const DEFAULT_QUOTA: &str = "100%";

/// Default connect timeout of a proxied host, in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 3;

/// Default read timeout of a proxied host, in seconds
pub const DEFAULT_READ_TIMEOUT: u64 = 15;

/// Directory that holds repositories without a custom mount
pub const REPOSITORIES_DIRECTORY: &str = "repositories";

/// Storage backend of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageDirective {
    /// Local file system (disk) storage
    #[serde(rename = "fs")]
    FileSystem(FileSystemSettings),
    /// Amazon S3 (or compatible) storage
    S3(S3Settings),
}

impl StorageDirective {
    /// Keyword that selects this provider in a directive
    pub fn keyword(&self) -> &'static str {
        match self {
            StorageDirective::FileSystem(_) => "fs",
            StorageDirective::S3(_) => "s3",
        }
    }
}

impl Default for StorageDirective {
    fn default() -> Self {
        StorageDirective::FileSystem(FileSystemSettings::default())
    }
}

/// Settings of the file system provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemSettings {
    /// Maximum amount of data, `90%` of the disk or an absolute size like `10GB`
    pub quota: String,
    /// Custom directory, empty means `repositories/<name>`
    pub mount: String,
}

impl Default for FileSystemSettings {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA.to_string(),
            mount: String::new(),
        }
    }
}

impl FileSystemSettings {
    /// Typed view of the quota
    ///
    /// Parsed directives always carry a valid quota, so this only fails for
    /// hand-built settings.
    pub fn quota_limit(&self) -> Result<Quota> {
        self.quota.parse()
    }

    /// Directory that holds the data of the given repository
    pub fn mount_path(&self, repository: &str) -> PathBuf {
        if self.mount.is_empty() {
            PathBuf::from(REPOSITORIES_DIRECTORY).join(repository)
        } else {
            PathBuf::from(&self.mount)
        }
    }
}

/// Settings of the S3 provider
///
/// Empty optional values mean "use the defaults of the S3 client".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Quota of the file system provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quota {
    /// Share of the disk, `0.0..`
    Percentage(f64),
    /// Absolute size in bytes
    Size(u64),
}

const SIZE_UNITS: &[(&str, u64)] = &[
    ("TB", 1024 * 1024 * 1024 * 1024),
    ("GB", 1024 * 1024 * 1024),
    ("MB", 1024 * 1024),
    ("KB", 1024),
    ("B", 1),
];

impl FromStr for Quota {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidQuota(s.to_string());

        if let Some(number) = s.strip_suffix('%') {
            return parse_decimal(number).map(Quota::Percentage).ok_or_else(invalid);
        }

        // Longest units first, otherwise "10GB" would be read as "10G" + "B"
        for (unit, multiplier) in SIZE_UNITS {
            if let Some(number) = s.strip_suffix(unit) {
                let value = parse_decimal(number).ok_or_else(invalid)?;
                return Ok(Quota::Size((value * *multiplier as f64) as u64));
            }
        }

        Err(invalid())
    }
}

/// Accepts `123` and `12.5`, nothing else (no sign, no exponent)
fn parse_decimal(number: &str) -> Option<f64> {
    let mut parts = number.splitn(2, '.');
    let integral = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integral) || fraction.is_some_and(|f| !all_digits(f)) {
        return None;
    }

    number.parse().ok()
}

/// One entry of a repository's proxied list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProxyEntry {
    /// Remote host reached over the network
    Host(HostDirective),
    /// Another repository configured on this instance
    LocalAlias { repository: String },
}

impl ProxyEntry {
    pub fn is_local(&self) -> bool {
        matches!(self, ProxyEntry::LocalAlias { .. })
    }
}

impl fmt::Display for ProxyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyEntry::Host(host) => write!(f, "{}", host.url),
            ProxyEntry::LocalAlias { repository } => write!(f, "local:{}", repository),
        }
    }
}

/// A proxied remote host and its connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDirective {
    pub url: String,
    /// Keep fetched artifacts locally
    pub store: bool,
    /// Seconds to wait for a connection, always > 0
    pub connect_timeout: u64,
    /// Seconds to wait for data, always > 0
    pub read_timeout: u64,
    /// Credentials sent to the remote host, e.g. `user:token`
    pub authorization: Option<String>,
    /// Group prefixes that may be fetched, empty allows everything
    pub allowed_groups: BTreeSet<String>,
    /// Outgoing proxy address, e.g. `host:port`
    pub proxy: Option<String>,
}

impl HostDirective {
    /// Host with default settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            store: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            authorization: None,
            allowed_groups: BTreeSet::new(),
            proxy: None,
        }
    }

    /// Whether artifacts of the given group may be fetched from this host
    pub fn allows(&self, group: &str) -> bool {
        self.allowed_groups.is_empty()
            || self
                .allowed_groups
                .iter()
                .any(|prefix| group.starts_with(prefix.as_str()))
    }
}
