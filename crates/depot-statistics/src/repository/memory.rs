//! In-memory statistics repository
//!
//! Cumulative counters kept for the lifetime of the process.

use super::StatisticsRepository;
use chrono::NaiveDate;
use dashmap::DashMap;
use depot_core::{Identifier, ResolvedEntry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory statistics repository
///
/// A sharded map of per-identifier atomic counters. Increments of different
/// identifiers do not contend, increments of one identifier are never lost.
/// Queries iterate the shards one by one, so a scan that runs next to
/// increments may see some of them and not others.
#[derive(Debug, Default)]
pub struct InMemoryStatisticsRepository {
    counters: DashMap<Identifier, AtomicU64>,
}

impl InMemoryStatisticsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&self, identifier: Identifier, delta: u64) {
        // Fast path: existing counter under a shard read lock
        if let Some(counter) = self.counters.get(&identifier) {
            saturating_add(&counter, delta);
            return;
        }

        let counter = self
            .counters
            .entry(identifier)
            .or_insert_with(|| AtomicU64::new(0));
        saturating_add(&counter, delta);
    }
}

/// Counters stop at `u64::MAX` instead of wrapping
pub(crate) fn saturating_add(counter: &AtomicU64, delta: u64) {
    // The closure never returns None, so the update always succeeds
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
        Some(count.saturating_add(delta))
    });
}

impl StatisticsRepository for InMemoryStatisticsRepository {
    fn increment_resolved_requests(&self, batch: HashMap<Identifier, u64>, _date: NaiveDate) {
        let size = batch.len();
        for (identifier, delta) in batch {
            self.add(identifier, delta);
        }
        tracing::trace!("Merged {} resolved request counters", size);
    }

    fn find_resolved_requests_by_phrase(
        &self,
        _repository: &str,
        phrase: &str,
        limit: usize,
    ) -> Vec<ResolvedEntry> {
        if limit == 0 {
            return Vec::new();
        }

        let mut matches: Vec<(String, ResolvedEntry)> = self
            .counters
            .iter()
            .filter_map(|entry| {
                let key = entry.key().to_string();
                key.contains(phrase).then(|| {
                    let count = entry.value().load(Ordering::Relaxed);
                    (key, ResolvedEntry::new(entry.key().gav.clone(), count))
                })
            })
            .collect();

        matches.sort_by(|(a_key, a), (b_key, b)| b.count.cmp(&a.count).then_with(|| a_key.cmp(b_key)));
        matches.truncate(limit);
        matches.into_iter().map(|(_, entry)| entry).collect()
    }

    fn count_unique_resolved_requests(&self) -> u64 {
        self.counters.len() as u64
    }

    fn count_resolved_requests(&self) -> u64 {
        self.counters
            .iter()
            .map(|entry| entry.value().load(Ordering::Relaxed))
            .fold(0u64, |total, count| total.saturating_add(count))
    }
}
