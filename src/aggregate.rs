//! Result aggregation.
//!
//! Records arrive in completion order. The aggregator derives the "active"
//! flag, keeps the completion order for progress and the screenshot hand-off,
//! and restores input order for the report. Per-item error categories are
//! summed here, so item pipelines share no counters.

use futures::{Stream, StreamExt};

use crate::error_handling::ProcessingStats;
use crate::models::EnrichedRecord;

/// Every record of a run, in completion order.
#[derive(Default)]
pub struct ResultSet {
    records: Vec<EnrichedRecord>,
    stats: ProcessingStats,
}

impl ResultSet {
    /// Degraded outcomes of the whole run.
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they completed.
    pub fn completion_order(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// Records re-sorted to input order, for the report.
    pub fn input_order(&self) -> Vec<&EnrichedRecord> {
        let mut ordered: Vec<&EnrichedRecord> = self.records.iter().collect();
        ordered.sort_by_key(|r| r.index);
        ordered
    }

    /// Active records, still in completion order.
    pub fn active(&self) -> impl Iterator<Item = &EnrichedRecord> {
        self.records.iter().filter(|r| r.active)
    }

    /// Hand-off URLs of the active records, in completion order.
    pub fn target_urls(&self) -> Vec<String> {
        self.active().filter_map(EnrichedRecord::target_url).collect()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Records whose input could not be normalized.
    pub fn invalid_count(&self) -> usize {
        self.records.iter().filter(|r| !r.key.is_valid()).count()
    }
}

/// Collects completed records into a `ResultSet`.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    liveness_enabled: bool,
}

impl Aggregator {
    pub fn new(liveness_enabled: bool) -> Self {
        Self { liveness_enabled }
    }

    /// A record is active when the liveness probe confirmed a scheme, or,
    /// without a probe, when an address was resolved.
    pub fn is_active(&self, record: &EnrichedRecord) -> bool {
        if self.liveness_enabled {
            record.scheme.is_some()
        } else {
            record.address.as_ip().is_some()
        }
    }

    /// Drains `records` until the stream ends.
    pub async fn collect<S>(&self, records: S) -> ResultSet
    where
        S: Stream<Item = EnrichedRecord>,
    {
        let mut set = ResultSet::default();
        let mut records = std::pin::pin!(records);
        while let Some(mut record) = records.next().await {
            record.active = record.key.is_valid() && self.is_active(&record);
            for error in &record.errors {
                set.stats.increment_error(*error);
            }
            set.records.push(record);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::{ErrorType, LookupError};
    use crate::models::{NormalizedKey, ResolvedAddress, Scheme};

    fn record(index: usize, domain: &str, address: Option<&str>, scheme: Option<Scheme>) -> EnrichedRecord {
        let mut record = EnrichedRecord::failed(
            index,
            domain.to_string(),
            NormalizedKey::Domain(domain.to_string()),
            LookupError::Provider("unused".into()),
        );
        record.address = match address {
            Some(ip) => ResolvedAddress::Found(ip.to_string()),
            None => ResolvedAddress::NotFound,
        };
        record.scheme = scheme;
        record
    }

    #[tokio::test]
    async fn test_completion_and_input_order() {
        let completed = vec![
            record(2, "c.example", Some("10.0.0.3"), Some(Scheme::Https)),
            record(0, "a.example", None, None),
            record(1, "b.example", Some("10.0.0.2"), Some(Scheme::Http)),
        ];
        let set = Aggregator::new(true)
            .collect(futures::stream::iter(completed))
            .await;

        let completion: Vec<_> = set.completion_order().iter().map(|r| r.index).collect();
        assert_eq!(completion, vec![2, 0, 1]);
        let input: Vec<_> = set.input_order().iter().map(|r| r.index).collect();
        assert_eq!(input, vec![0, 1, 2]);
        assert_eq!(
            set.target_urls(),
            vec!["https://c.example".to_string(), "http://b.example".to_string()]
        );
        assert_eq!(set.active_count(), 2);
    }

    #[tokio::test]
    async fn test_active_without_liveness_means_resolved() {
        let completed = vec![
            record(0, "a.example", Some("10.0.0.1"), None),
            record(1, "b.example", None, None),
        ];
        let set = Aggregator::new(false)
            .collect(futures::stream::iter(completed))
            .await;
        let active: Vec<_> = set.active().map(|r| r.index).collect();
        assert_eq!(active, vec![0]);
        assert_eq!(set.target_urls(), vec!["http://a.example".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_records_are_never_active() {
        let invalid = EnrichedRecord::failed(
            0,
            "bad..domain".into(),
            NormalizedKey::Invalid,
            LookupError::Normalization("bad..domain".into()),
        );
        let set = Aggregator::new(false)
            .collect(futures::stream::iter(vec![invalid]))
            .await;
        assert_eq!(set.len(), 1);
        assert_eq!(set.invalid_count(), 1);
        assert_eq!(set.active_count(), 0);
    }

    #[tokio::test]
    async fn test_record_errors_are_summed() {
        let completed = vec![
            record(0, "a.example", None, None)
                .with_error(ErrorType::NoIpFound)
                .with_error(ErrorType::WhoisLookupFailed),
            record(1, "b.example", None, None).with_error(ErrorType::NoIpFound),
            record(2, "c.example", Some("10.0.0.3"), Some(Scheme::Http)),
        ];
        let set = Aggregator::new(true)
            .collect(futures::stream::iter(completed))
            .await;
        assert_eq!(set.stats().get_error_count(ErrorType::NoIpFound), 2);
        assert_eq!(set.stats().get_error_count(ErrorType::WhoisLookupFailed), 1);
        assert_eq!(set.stats().total_errors(), 3);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let set = Aggregator::new(true)
            .collect(futures::stream::empty())
            .await;
        assert!(set.is_empty());
        assert!(set.target_urls().is_empty());
    }
}
