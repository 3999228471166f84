//! Depot Parser - directive grammar for repository settings
//!
//! Repository settings describe their storage backend and proxied upstreams
//! with short command-like strings:
//!
//! ```text
//! fs --quota 50GB --mount /mnt/releases
//! s3 bucket-name --endpoint custom.endpoint.com --region eu-west-1
//! https://repo.maven.apache.org/maven2 --store --connectTimeout=5 --allow=org.apache
//! releases
//! ```
//!
//! This crate turns those strings into the typed values of
//! [`depot_core::directive`].
//!
//! ```rust
//! use depot_core::{ProxyEntry, StorageDirective};
//! use depot_parser::{ProxyParser, StorageParser};
//!
//! let storage = StorageParser::parse("fs --quota 50GB").unwrap();
//! assert!(matches!(storage, StorageDirective::FileSystem(_)));
//!
//! let proxy = ProxyParser::parse("snapshots").unwrap();
//! assert!(matches!(proxy, ProxyEntry::LocalAlias { .. }));
//! ```

pub mod error;
pub mod flag_parser;
pub mod proxy_parser;
pub mod storage_parser;
pub mod tokenizer;

// Re-export main parser types
pub use error::{DirectiveError, Result};
pub use flag_parser::{Arguments, FlagKind, FlagSpec};
pub use proxy_parser::ProxyParser;
pub use storage_parser::StorageParser;
pub use tokenizer::{tokenize, Token};
