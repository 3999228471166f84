//! Repository settings for Depot
//!
//! This crate loads the shared configuration document: server level scalar
//! settings plus one [`RepositoryConfiguration`] per named repository, whose
//! storage and proxy directives are parsed by `depot-parser`.
//!
//! # Quick Start
//!
//! ```rust
//! use depot_core::StorageDirective;
//! use depot_settings::{SettingsHandle, SharedConfiguration};
//!
//! let yaml = r#"
//! basePath: api
//! repositories:
//!   releases:
//!     storageProvider: fs --quota 50GB
//!     proxied:
//!       - https://repo.maven.apache.org/maven2 --store
//! "#;
//!
//! let document = SharedConfiguration::from_yaml_str(yaml).unwrap();
//! assert_eq!(document.base_path, "/api/");
//!
//! let releases = document.repository("releases").unwrap();
//! assert!(matches!(releases.storage(), StorageDirective::FileSystem(_)));
//!
//! // Readers always see a whole document
//! let handle = SettingsHandle::new(document);
//! assert_eq!(handle.current().version(), 1);
//! ```
//!
//! # Architecture
//!
//! ```text
//! YAML text ──► schema tables ──► RepositoryBuilder::build ──► directive parser
//!                    │
//!                    ▼
//!          SharedConfiguration (normalized)
//!                    │ publish
//!                    ▼
//!          SettingsHandle ──► Arc<SettingsSnapshot> ──► readers
//! ```

pub mod error;
pub mod handle;
pub mod repository;
mod schema;
pub mod shared;
pub mod yaml;

// Re-exports
pub use error::{Result, SettingsError};
pub use handle::{SettingsHandle, SettingsSnapshot};
pub use repository::{RepositoryBuilder, RepositoryConfiguration, DEFAULT_STORAGE_PROVIDER};
pub use shared::{normalize_base_path, LdapConfiguration, SharedConfiguration, StatisticsConfiguration};
