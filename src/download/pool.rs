//! Bounded download pool.
//!
//! One producer feeds a bounded mpsc queue; `worker_count` workers share the
//! receiver and each run download, write and record for one item at a time.
//! Every enqueued item ends up counted as downloaded or failed.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::FutureExt;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

use super::client::HttpClient;
use super::constants::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, MAX_QUEUE_CAPACITY, MAX_WORKER_COUNT,
    MIN_QUEUE_CAPACITY, MIN_WORKER_COUNT,
};
use crate::asset::PendingDownload;
use crate::store::CompletionRecorder;

/// Errors raised when constructing a pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Worker count outside the accepted range.
    #[error("worker count {0} is out of range (1..=100)")]
    InvalidWorkerCount(usize),

    /// Queue capacity outside the accepted range.
    #[error("queue capacity {0} is out of range (1..=10000)")]
    InvalidQueueCapacity(usize),
}

/// Pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of concurrent workers.
    pub worker_count: usize,
    /// Capacity of the bounded queue between producer and workers.
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Checks both values against their accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns the [`PoolError`] for the first out-of-range value.
    pub fn validate(&self) -> Result<(), PoolError> {
        if !(MIN_WORKER_COUNT..=MAX_WORKER_COUNT).contains(&self.worker_count) {
            return Err(PoolError::InvalidWorkerCount(self.worker_count));
        }
        if !(MIN_QUEUE_CAPACITY..=MAX_QUEUE_CAPACITY).contains(&self.queue_capacity) {
            return Err(PoolError::InvalidQueueCapacity(self.queue_capacity));
        }
        Ok(())
    }
}

/// Counters reported once the pool has drained.
///
/// `downloaded + failed == enqueued` after [`DownloadPool::run`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Items handed to the workers.
    pub enqueued: usize,
    /// Items whose file was written.
    pub downloaded: usize,
    /// Items that failed to download or write.
    pub failed: usize,
    /// Downloaded items the recorder rejected; a subset of `downloaded`.
    pub record_failed: usize,
}

impl PoolStats {
    /// Returns the number of items that reached a terminal outcome.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.downloaded + self.failed
    }
}

#[derive(Debug, Default)]
struct PoolCounters {
    enqueued: AtomicUsize,
    downloaded: AtomicUsize,
    failed: AtomicUsize,
    record_failed: AtomicUsize,
}

impl PoolCounters {
    fn snapshot(&self) -> PoolStats {
        PoolStats {
            enqueued: self.enqueued.load(Ordering::SeqCst),
            downloaded: self.downloaded.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            record_failed: self.record_failed.load(Ordering::SeqCst),
        }
    }
}

enum ItemOutcome {
    Recorded,
    RecordFailed,
    Failed,
}

/// Fixed-size worker pool draining one bounded queue.
#[derive(Clone)]
pub struct DownloadPool {
    config: PoolConfig,
    client: HttpClient,
    recorder: Arc<dyn CompletionRecorder>,
}

impl std::fmt::Debug for DownloadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadPool")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DownloadPool {
    /// Creates a pool after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] when the worker count or queue capacity is out of range.
    pub fn new(
        config: PoolConfig,
        client: HttpClient,
        recorder: Arc<dyn CompletionRecorder>,
    ) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            recorder,
        })
    }

    /// Returns the validated configuration.
    #[must_use]
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Downloads every item and returns the final counters.
    ///
    /// Blocks until the producer and all workers have finished.
    #[instrument(skip(self, items), fields(items = items.len(), workers = self.config.worker_count))]
    pub async fn run(&self, items: Vec<PendingDownload>) -> PoolStats {
        let counters = Arc::new(PoolCounters::default());
        let (tx, rx) = mpsc::channel::<PendingDownload>(self.config.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));
        let mut tasks = JoinSet::new();

        {
            let counters = Arc::clone(&counters);
            tasks.spawn(async move {
                for item in items {
                    let file_name = item.file_name.clone();
                    if tx.send(item).await.is_err() {
                        warn!("download queue closed before all items were enqueued");
                        break;
                    }
                    counters.enqueued.fetch_add(1, Ordering::SeqCst);
                    info!(file = %file_name, "file has been enqueued");
                }
                // Dropping `tx` here closes the queue once it drains.
            });
        }

        for worker_id in 0..self.config.worker_count {
            let rx = Arc::clone(&rx);
            let client = self.client.clone();
            let recorder = Arc::clone(&self.recorder);
            let counters = Arc::clone(&counters);

            tasks.spawn(async move {
                loop {
                    // Lock held only while waiting for the next item.
                    let next = rx.lock().await.recv().await;
                    let Some(item) = next else {
                        break;
                    };

                    let outcome =
                        AssertUnwindSafe(process_item(&client, recorder.as_ref(), &item))
                            .catch_unwind()
                            .await;

                    match outcome {
                        Ok(ItemOutcome::Recorded) => {
                            counters.downloaded.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(ItemOutcome::RecordFailed) => {
                            counters.downloaded.fetch_add(1, Ordering::SeqCst);
                            counters.record_failed.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(ItemOutcome::Failed) => {
                            counters.failed.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(_) => {
                            error!(
                                worker = worker_id,
                                url = %item.url,
                                "worker panicked while processing item"
                            );
                            counters.failed.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                }
                debug!(worker = worker_id, "worker done and exit");
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(join_error) = joined {
                error!(error = %join_error, "download pool task failed");
            }
        }
        info!("all workers are done");

        counters.snapshot()
    }
}

async fn process_item(
    client: &HttpClient,
    recorder: &dyn CompletionRecorder,
    item: &PendingDownload,
) -> ItemOutcome {
    let saved = match client
        .download_to_file(&item.url, &item.dest_dir, &item.file_name)
        .await
    {
        Ok(saved) => saved,
        Err(error) => {
            warn!(file = %item.file_name, url = %item.url, error = %error, "download failed");
            return ItemOutcome::Failed;
        }
    };

    let file_name = saved
        .path
        .file_name()
        .map_or_else(|| item.file_name.clone(), |name| name.to_string_lossy().into_owned());
    info!(file = %file_name, bytes = saved.bytes, "download done");

    match recorder.record(item, &file_name).await {
        Ok(()) => ItemOutcome::Recorded,
        Err(error) => {
            warn!(
                file = %file_name,
                id = %item.asset_id,
                kind = %item.kind,
                db_error_kind = %error.kind(),
                error = %error,
                "failed to record download"
            );
            ItemOutcome::RecordFailed
        }
    }
}
