//! Artifact resolution statistics for Depot
//!
//! Counts how often each artifact was resolved and answers ranked lookups
//! over those counts.
//!
//! - [`StatisticsRepository`]: storage seam for counters
//! - [`InMemoryStatisticsRepository`]: concurrent in-process counters
//! - [`StatisticsFacade`]: batches single resolutions and flushes them into
//!   a repository with a bucketed date
//!
//! ```rust
//! use depot_core::Identifier;
//! use depot_statistics::{InMemoryStatisticsRepository, StatisticsRepository};
//! use std::collections::HashMap;
//!
//! let repository = InMemoryStatisticsRepository::new();
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
//!
//! let gav = Identifier::new("releases", "com/example/lib/1.0/lib-1.0.jar");
//! repository.increment_resolved_requests(HashMap::from([(gav, 3)]), today);
//!
//! assert_eq!(repository.count_resolved_requests(), 3);
//! ```

pub mod facade;
pub mod repository;

pub use facade::StatisticsFacade;
pub use repository::{InMemoryStatisticsRepository, StatisticsRepository};
