//! Depot server library
//!
//! Process configuration and wiring, shared by the binary and its tests.

pub mod bootstrap;
pub mod config;
pub mod error;

pub use bootstrap::Depot;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
