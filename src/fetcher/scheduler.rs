//! Batch scheduler for item fetches
//!
//! This module handles:
//! - Partitioning the id set into fixed-size, sequential batches
//! - Running every item of a batch concurrently behind a global semaphore
//! - Pausing between batches to respect the upstream request-rate policy
//!
//! Items of a batch are polled together on the calling task, so concurrency
//! here means overlapping network waits, not parallel CPU work.

use crate::config::FetcherConfig;
use crate::fetcher::item::ItemFetcher;
use crate::output::FetchStatistics;
use crate::record::{ObjectId, ResultCollection};
use crate::state::{DropReason, FetchFailure, ItemOutcome};
use futures::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Records and counts produced by one scheduler run
#[derive(Debug)]
pub struct ScheduleReport {
    /// Enriched records in completion order
    pub records: ResultCollection,

    /// Per-item and per-batch counts
    pub stats: FetchStatistics,
}

/// Runs item fetches batch by batch
///
/// Two limits apply at once: the admission gate caps how many fetches are in
/// flight, and the inter-batch delay caps how fast batches follow each other.
pub struct BatchScheduler {
    /// Admission gate bounding in-flight fetches
    gate: Semaphore,

    max_concurrent: usize,

    batch_size: usize,

    batch_delay: Duration,
}

impl BatchScheduler {
    /// Creates a scheduler from the fetcher policy
    pub fn new(config: &FetcherConfig) -> Self {
        let max_concurrent = config.max_concurrent_requests.max(1) as usize;

        Self {
            gate: Semaphore::new(max_concurrent),
            max_concurrent,
            batch_size: config.batch_size.max(1),
            batch_delay: config.batch_delay(),
        }
    }

    /// Number of batches a set of `len` ids is split into
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.batch_size)
    }

    /// The configured concurrency limit
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Number of free admission slots; equals the limit when idle
    pub fn available_slots(&self) -> usize {
        self.gate.available_permits()
    }

    /// Fetches every id and collects the enriched records
    ///
    /// Batch N+1 starts only after every item of batch N has finished. Dropped
    /// items are counted but not collected; the fetcher has already logged
    /// them. An empty id set returns immediately without pausing.
    pub async fn run<F: ItemFetcher>(&self, fetcher: &F, ids: &[ObjectId]) -> ScheduleReport {
        let mut records = ResultCollection::new();
        let mut stats = FetchStatistics::new();
        let total_batches = self.batch_count(ids.len());

        for (index, batch) in ids.chunks(self.batch_size).enumerate() {
            tracing::info!(
                "Processing batch {}/{}: {:?}",
                index + 1,
                total_batches,
                batch
            );

            let mut in_flight: FuturesUnordered<_> =
                batch.iter().map(|&id| self.admit(fetcher, id)).collect();

            while let Some(outcome) = in_flight.next().await {
                stats.record_outcome(&outcome);
                if let Some(record) = outcome.into_record() {
                    records.push(record);
                }
            }

            stats.batches += 1;
            tracing::info!(
                "Batch {}/{} complete: {} records collected so far",
                index + 1,
                total_batches,
                records.len()
            );

            if index + 1 < total_batches {
                tracing::info!(
                    "Waiting {:?} before next batch",
                    self.batch_delay
                );
                stats.pauses += 1;
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        ScheduleReport { records, stats }
    }

    /// Waits for a slot, then runs one fetch while holding it
    ///
    /// The permit is released when it drops, whichever way the fetch ends.
    async fn admit<F: ItemFetcher>(&self, fetcher: &F, id: ObjectId) -> ItemOutcome {
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                tracing::error!("Object {}: admission gate closed", id);
                return ItemOutcome::Dropped(DropReason::MetadataFailed(FetchFailure::Transport(
                    "admission gate closed".to_string(),
                )));
            }
        };

        fetcher.fetch(id).await
    }
}
