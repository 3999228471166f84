//! Statistics repositories
//!
//! Backends storing resolution counters and answering queries over them.

mod memory;

pub use memory::InMemoryStatisticsRepository;
pub(crate) use memory::saturating_add;

use chrono::NaiveDate;
use depot_core::{Identifier, ResolvedEntry};
use std::collections::HashMap;

/// Storage for resolution counters
///
/// Implementations are shared between request handlers and must accept
/// concurrent calls. Queries never mutate and never fail.
pub trait StatisticsRepository: Send + Sync {
    /// Add every delta of `batch` to its counter, absent counters start at 0
    ///
    /// Counters saturate at `u64::MAX`.
    ///
    /// `date` is the bucket the batch belongs to; backends without history
    /// may ignore it.
    fn increment_resolved_requests(&self, batch: HashMap<Identifier, u64>, date: NaiveDate);

    /// Up to `limit` entries whose `<repository>/<gav>` form contains `phrase`
    ///
    /// Ordered by count, highest first, then by identifier. `repository`
    /// names the caller's context and does not narrow the match.
    fn find_resolved_requests_by_phrase(
        &self,
        repository: &str,
        phrase: &str,
        limit: usize,
    ) -> Vec<ResolvedEntry>;

    /// Number of distinct identifiers recorded
    fn count_unique_resolved_requests(&self) -> u64;

    /// Sum of all counters
    fn count_resolved_requests(&self) -> u64;
}
