//! Statistics facade
//!
//! Request handlers record one resolution at a time; the facade batches them
//! in memory and a periodic task flushes the batch into the repository.

use crate::repository::{saturating_add, StatisticsRepository};
use chrono::NaiveDate;
use dashmap::DashMap;
use depot_core::{Identifier, ResolvedEntry, ResolvedRequestsInterval};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Batching front of a [`StatisticsRepository`]
pub struct StatisticsFacade {
    repository: Arc<dyn StatisticsRepository>,
    pending: DashMap<Identifier, AtomicU64>,
    interval: RwLock<ResolvedRequestsInterval>,
}

impl StatisticsFacade {
    pub fn new(repository: Arc<dyn StatisticsRepository>, interval: ResolvedRequestsInterval) -> Self {
        Self {
            repository,
            pending: DashMap::new(),
            interval: RwLock::new(interval),
        }
    }

    /// Count one resolution of `identifier` in the pending batch
    pub fn record_resolved(&self, identifier: Identifier) {
        if let Some(counter) = self.pending.get(&identifier) {
            saturating_add(&counter, 1);
            return;
        }

        let counter = self
            .pending
            .entry(identifier)
            .or_insert_with(|| AtomicU64::new(0));
        saturating_add(&counter, 1);
    }

    /// Number of distinct identifiers waiting for the next flush
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn interval(&self) -> ResolvedRequestsInterval {
        *self.interval.read()
    }

    /// Applies to flushes from now on
    pub fn set_interval(&self, interval: ResolvedRequestsInterval) {
        *self.interval.write() = interval;
    }

    /// Drain the pending batch into the repository
    ///
    /// The batch is stored under the bucket of `today`. A resolution recorded
    /// while the flush runs lands either in this batch or in the next one.
    /// Returns the number of identifiers submitted.
    pub fn flush(&self, today: NaiveDate) -> usize {
        let keys: Vec<Identifier> = self.pending.iter().map(|entry| entry.key().clone()).collect();

        let mut batch = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some((identifier, counter)) = self.pending.remove(&key) {
                batch.insert(identifier, counter.into_inner());
            }
        }

        if batch.is_empty() {
            return 0;
        }

        let size = batch.len();
        let bucket = self.interval().bucket(today);
        self.repository.increment_resolved_requests(batch, bucket);

        tracing::debug!("Flushed {} resolved request counters into bucket {}", size, bucket);
        size
    }

    pub fn find_resolved_requests_by_phrase(
        &self,
        repository: &str,
        phrase: &str,
        limit: usize,
    ) -> Vec<ResolvedEntry> {
        self.repository.find_resolved_requests_by_phrase(repository, phrase, limit)
    }

    pub fn count_unique_resolved_requests(&self) -> u64 {
        self.repository.count_unique_resolved_requests()
    }

    pub fn count_resolved_requests(&self) -> u64 {
        self.repository.count_resolved_requests()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStatisticsRepository;
    use parking_lot::Mutex;

    /// Repository that remembers every submitted batch
    #[derive(Default)]
    struct RecordingRepository {
        batches: Mutex<Vec<(HashMap<Identifier, u64>, NaiveDate)>>,
    }

    impl StatisticsRepository for RecordingRepository {
        fn increment_resolved_requests(&self, batch: HashMap<Identifier, u64>, date: NaiveDate) {
            self.batches.lock().push((batch, date));
        }

        fn find_resolved_requests_by_phrase(&self, _: &str, _: &str, _: usize) -> Vec<ResolvedEntry> {
            Vec::new()
        }

        fn count_unique_resolved_requests(&self) -> u64 {
            0
        }

        fn count_resolved_requests(&self) -> u64 {
            0
        }
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_flush_submits_aggregated_batch() {
        let recording = Arc::new(RecordingRepository::default());
        let facade = StatisticsFacade::new(recording.clone(), ResolvedRequestsInterval::Monthly);

        let a = Identifier::new("releases", "a/1.0");
        let b = Identifier::new("snapshots", "b/1.0");
        facade.record_resolved(a.clone());
        facade.record_resolved(a.clone());
        facade.record_resolved(b.clone());
        assert_eq!(facade.pending_len(), 2);

        assert_eq!(facade.flush(day(2024, 5, 17)), 2);
        assert_eq!(facade.pending_len(), 0);

        let batches = recording.batches.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0, HashMap::from([(a, 2), (b, 1)]));
        assert_eq!(batches[0].1, day(2024, 5, 1));
    }

    #[test]
    fn test_empty_flush_skips_repository() {
        let recording = Arc::new(RecordingRepository::default());
        let facade = StatisticsFacade::new(recording.clone(), ResolvedRequestsInterval::Daily);

        assert_eq!(facade.flush(day(2024, 5, 17)), 0);
        assert!(recording.batches.lock().is_empty());
    }

    #[test]
    fn test_interval_change_applies_to_next_flush() {
        let recording = Arc::new(RecordingRepository::default());
        let facade = StatisticsFacade::new(recording.clone(), ResolvedRequestsInterval::Daily);

        facade.record_resolved(Identifier::new("releases", "a"));
        facade.flush(day(2024, 5, 17));

        facade.set_interval(ResolvedRequestsInterval::Yearly);
        facade.record_resolved(Identifier::new("releases", "a"));
        facade.flush(day(2024, 5, 17));

        let dates: Vec<NaiveDate> = recording.batches.lock().iter().map(|(_, date)| *date).collect();
        assert_eq!(dates, vec![day(2024, 5, 17), day(2024, 1, 1)]);
    }

    #[test]
    fn test_queries_delegate_to_repository() {
        let facade = StatisticsFacade::new(
            Arc::new(InMemoryStatisticsRepository::new()),
            ResolvedRequestsInterval::Monthly,
        );

        facade.record_resolved(Identifier::new("releases", "a"));
        assert_eq!(facade.count_resolved_requests(), 0);

        facade.flush(day(2024, 5, 17));
        assert_eq!(facade.count_resolved_requests(), 1);
        assert_eq!(facade.count_unique_resolved_requests(), 1);
        assert_eq!(
            facade.find_resolved_requests_by_phrase("", "a", 5),
            vec![ResolvedEntry::new("a", 1)]
        );
    }
}
