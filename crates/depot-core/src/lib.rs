//! Depot Core - shared types for the Depot artifact repository manager
//!
//! This crate provides the fundamental types used across the workspace:
//! - Repository level enums (visibility, token types)
//! - Directive AST produced by `depot-parser` (storage providers, proxied hosts)
//! - Statistics keys and query projections
//! - Error types

pub mod directive;
pub mod error;
pub mod repository;
pub mod statistics;

// Re-export commonly used types
pub use directive::{
    FileSystemSettings, HostDirective, ProxyEntry, Quota, S3Settings, StorageDirective,
};
pub use error::{CoreError, Result};
pub use repository::{AccessTokenType, RepositoryVisibility};
pub use statistics::{Identifier, ResolvedEntry, ResolvedRequestsInterval};
