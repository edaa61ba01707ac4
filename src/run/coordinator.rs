//! Bounded-concurrency coordinator.
//!
//! Items are admitted in submission order through a semaphore of `K`
//! permits. Each admitted item runs its pipeline in its own task under a
//! deadline and panic guard, and always sends exactly one record to the
//! aggregator. A periodic throttle adds a pause after every `N` dequeued
//! items. Cancelling the run stops admission; items not yet admitted get a
//! skipped record.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use log::{debug, info, warn};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use super::pipeline::{enrich, Adapters};
use super::progress::{log_progress, Progress, ProgressCounters};
use super::throttle::Throttle;
use crate::aggregate::{Aggregator, ResultSet};
use crate::config::{
    Config, DEFAULT_MAX_CONCURRENCY, DEFAULT_PROGRESS_INTERVAL_SECS, DEFAULT_THROTTLE_EVERY,
    DEFAULT_THROTTLE_PAUSE_SECS, ITEM_PROCESSING_TIMEOUT_SECS, SKIPPED_ABORTED,
};
use crate::domain::normalize;
use crate::error_handling::{ErrorType, LookupError};
use crate::models::EnrichedRecord;

/// Scheduling knobs of a run.
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Admission bound `K`
    pub max_concurrency: usize,
    /// Throttle period `N` (0 disables the throttle)
    pub throttle_every: usize,
    pub throttle_pause: Duration,
    /// Deadline of one whole item pipeline
    pub item_timeout: Duration,
    /// Interval of the progress line (`None` disables it)
    pub progress_interval: Option<Duration>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            throttle_every: DEFAULT_THROTTLE_EVERY,
            throttle_pause: Duration::from_secs(DEFAULT_THROTTLE_PAUSE_SECS),
            item_timeout: Duration::from_secs(ITEM_PROCESSING_TIMEOUT_SECS),
            progress_interval: Some(Duration::from_secs(DEFAULT_PROGRESS_INTERVAL_SECS)),
        }
    }
}

impl From<&Config> for CoordinatorOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_concurrency: config.max_concurrency,
            throttle_every: config.throttle_every,
            throttle_pause: config.throttle_pause(),
            item_timeout: config.item_timeout(),
            progress_interval: (config.progress_interval_secs > 0)
                .then(|| Duration::from_secs(config.progress_interval_secs)),
        }
    }
}

pub struct Coordinator {
    adapters: Arc<Adapters>,
    options: CoordinatorOptions,
    progress: Arc<ProgressCounters>,
    cancel: CancellationToken,
}

impl Coordinator {
    pub fn new(adapters: Adapters, options: CoordinatorOptions) -> Self {
        Self {
            adapters: Arc::new(adapters),
            options: CoordinatorOptions {
                max_concurrency: options.max_concurrency.max(1),
                ..options
            },
            progress: Arc::new(ProgressCounters::default()),
            cancel: CancellationToken::new(),
        }
    }

    /// Uses `token` to abort the run instead of a private one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that aborts the run when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Thread-safe snapshot of the admitted/completed counts.
    pub fn progress(&self) -> Progress {
        self.progress.snapshot()
    }

    /// Runs every item and returns one record per item.
    pub async fn run(&self, items: Vec<String>) -> ResultSet {
        let total = items.len();
        self.progress.reset(total);
        info!(
            "Starting lookups for {} items (max concurrency {}, pause {}s every {} items)",
            total,
            self.options.max_concurrency,
            self.options.throttle_pause.as_secs(),
            self.options.throttle_every
        );

        let start_time = Instant::now();
        let stop_logging = CancellationToken::new();
        let logging_task = self.spawn_progress_logger(start_time, stop_logging.clone());

        let (tx, mut rx) = mpsc::unbounded_channel::<EnrichedRecord>();
        let aggregator = Aggregator::new(self.adapters.liveness.is_some());

        let admission = self.admit_all(items, tx);
        let collection = aggregator.collect(futures::stream::poll_fn(|cx| rx.poll_recv(cx)));
        let ((), results) = tokio::join!(admission, collection);

        stop_logging.cancel();
        if let Some(task) = logging_task {
            let _ = task.await;
        }
        log_progress(start_time, &self.progress());

        results
    }

    /// Admission loop. Drops its sender once every item has either been
    /// spawned or answered with a skipped record.
    async fn admit_all(&self, items: Vec<String>, tx: mpsc::UnboundedSender<EnrichedRecord>) {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency));
        let mut throttle = Throttle::new(self.options.throttle_every, self.options.throttle_pause);
        let total = items.len();
        let mut pending = items.into_iter().enumerate();

        while let Some((index, input)) = pending.next() {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                warn!("Run aborted, skipping {} unadmitted items", total - index);
                for (index, input) in std::iter::once((index, input)).chain(pending.by_ref()) {
                    self.skip(index, input, &tx);
                }
                break;
            };

            self.progress.admit();
            self.spawn_item(index, input, permit, tx.clone());

            if let Some(pause) = throttle.record_dequeue() {
                if throttle.dequeued() < total {
                    info!(
                        "Throttling: pausing {}s after {} items",
                        pause.as_secs(),
                        throttle.dequeued()
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(pause) => {}
                        _ = self.cancel.cancelled() => {}
                    }
                }
            }
        }
    }

    /// Emits the record of an item that never got a slot.
    fn skip(&self, index: usize, input: String, tx: &mpsc::UnboundedSender<EnrichedRecord>) {
        let key = normalize(&input);
        let record = EnrichedRecord::failed(
            index,
            input,
            key,
            LookupError::Provider(SKIPPED_ABORTED.to_string()),
        )
        .with_error(ErrorType::ItemSkipped);
        self.progress.complete();
        let _ = tx.send(record);
    }

    fn spawn_item(
        &self,
        index: usize,
        input: String,
        permit: tokio::sync::OwnedSemaphorePermit,
        tx: mpsc::UnboundedSender<EnrichedRecord>,
    ) {
        let adapters = Arc::clone(&self.adapters);
        let progress = Arc::clone(&self.progress);
        let item_timeout = self.options.item_timeout;

        tokio::spawn(async move {
            let key = normalize(&input);
            let pipeline =
                AssertUnwindSafe(enrich(index, input.clone(), key.clone(), &adapters))
                    .catch_unwind();

            let record = match tokio::time::timeout(item_timeout, pipeline).await {
                Ok(Ok(record)) => record,
                Ok(Err(_panic)) => {
                    warn!("Pipeline for {} panicked", input);
                    EnrichedRecord::failed(
                        index,
                        input,
                        key,
                        LookupError::Transport("item pipeline panicked".to_string()),
                    )
                    .with_error(ErrorType::ItemPanicked)
                }
                Err(_) => {
                    warn!(
                        "Timeout processing {} after {}s",
                        input,
                        item_timeout.as_secs()
                    );
                    EnrichedRecord::failed(index, input, key, LookupError::Timeout(item_timeout))
                        .with_error(ErrorType::ItemTimeout)
                }
            };

            // Release the counter before the permit so in_flight never exceeds K
            progress.release();
            drop(permit);
            progress.complete();
            debug!("Item {} complete", index);
            if tx.send(record).is_err() {
                warn!("Result collector closed before item {} was recorded", index);
            }
        });
    }

    fn spawn_progress_logger(
        &self,
        start_time: Instant,
        stop: CancellationToken,
    ) -> Option<tokio::task::JoinHandle<()>> {
        let interval = self.options.progress_interval?;
        let progress = Arc::clone(&self.progress);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => log_progress(start_time, &progress.snapshot()),
                    _ = stop.cancelled() => break,
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedKey;
    use crate::run::fakes::{adapters, FakeGeo, FakeResolver, FakeWhois};

    fn options(max_concurrency: usize) -> CoordinatorOptions {
        CoordinatorOptions {
            max_concurrency,
            throttle_every: 0,
            throttle_pause: Duration::ZERO,
            item_timeout: Duration::from_secs(5),
            progress_interval: None,
        }
    }

    #[tokio::test]
    async fn test_every_item_yields_one_record() {
        let whois = FakeWhois::failing();
        let resolver = FakeResolver::not_found();
        let geo = FakeGeo::new();
        let coordinator = Coordinator::new(adapters(&whois, &resolver, &geo), options(3));

        let items: Vec<String> = (0..20).map(|i| format!("site{i}.example")).collect();
        let results = coordinator.run(items).await;

        assert_eq!(results.len(), 20);
        let indexes: Vec<_> = results.input_order().iter().map(|r| r.index).collect();
        assert_eq!(indexes, (0..20).collect::<Vec<_>>());
        assert!(results.completion_order().iter().all(|r| r.whois.is_err()));
        assert_eq!(geo.calls(), 0);
        let progress = coordinator.progress();
        assert_eq!(progress.completed, 20);
        assert_eq!(progress.in_flight, 0);
    }

    #[tokio::test]
    async fn test_admission_bound_holds() {
        let whois = FakeWhois::slow(Duration::from_millis(20));
        let resolver = FakeResolver::found("10.0.0.1");
        let geo = FakeGeo::new();
        let coordinator = Coordinator::new(adapters(&whois, &resolver, &geo), options(4));

        let items: Vec<String> = (0..25).map(|i| format!("host{i}.example")).collect();
        let results = coordinator.run(items).await;

        assert_eq!(results.len(), 25);
        assert!(whois.peak() <= 4, "peak WHOIS concurrency {}", whois.peak());
        assert!(coordinator.progress().peak_in_flight <= 4);
        assert_eq!(geo.calls(), 25);
    }

    #[tokio::test]
    async fn test_item_timeout_yields_flagged_record() {
        let whois = FakeWhois::slow(Duration::from_secs(60));
        let resolver = FakeResolver::found("10.0.0.1");
        let geo = FakeGeo::new();
        let coordinator = Coordinator::new(
            adapters(&whois, &resolver, &geo),
            CoordinatorOptions {
                item_timeout: Duration::from_millis(50),
                ..options(2)
            },
        );

        let results = coordinator.run(vec!["slow.example".to_string()]).await;
        assert_eq!(results.len(), 1);
        let record = &results.completion_order()[0];
        assert!(matches!(record.whois, Err(LookupError::Timeout(_))));
        assert_eq!(results.stats().get_error_count(ErrorType::ItemTimeout), 1);
    }

    #[tokio::test]
    async fn test_cancelled_run_skips_unadmitted_items() {
        let whois = FakeWhois::failing();
        let resolver = FakeResolver::not_found();
        let geo = FakeGeo::new();
        let coordinator = Coordinator::new(adapters(&whois, &resolver, &geo), options(2));
        coordinator.cancellation_token().cancel();

        let results = coordinator
            .run(vec!["a.example".into(), "bad..domain".into()])
            .await;
        assert_eq!(results.len(), 2);
        for record in results.completion_order() {
            assert_eq!(
                record.whois,
                Err(LookupError::Provider(SKIPPED_ABORTED.to_string()))
            );
        }
        assert_eq!(results.input_order()[1].key, NormalizedKey::Invalid);
        assert_eq!(whois.calls(), 0);
    }

    #[tokio::test]
    async fn test_throttle_pauses_between_batches() {
        let whois = FakeWhois::failing();
        let resolver = FakeResolver::not_found();
        let geo = FakeGeo::new();
        let coordinator = Coordinator::new(
            adapters(&whois, &resolver, &geo),
            CoordinatorOptions {
                throttle_every: 2,
                throttle_pause: Duration::from_millis(100),
                ..options(10)
            },
        );

        let started = Instant::now();
        let results = coordinator
            .run((0..5).map(|i| format!("t{i}.example")).collect())
            .await;
        assert_eq!(results.len(), 5);
        // Pauses after items 2 and 4, none after the last one
        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
