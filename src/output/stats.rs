//! Statistics for a harvest run
//!
//! Counts are accumulated by the batch scheduler as items complete and
//! finished by the orchestrator once results are written.

use crate::state::{DropReason, ItemOutcome};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// Harvest run statistics
#[derive(Debug, Clone)]
pub struct FetchStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (set once results are written)
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of ids returned by the listing call
    pub discovered: usize,

    /// Number of items handed to the item fetcher
    pub attempted: usize,

    /// Number of items that produced a record
    pub enriched: usize,

    /// Dropped items keyed by [`DropReason::label`]
    pub dropped: HashMap<&'static str, usize>,

    /// Number of batches executed
    pub batches: usize,

    /// Number of inter-batch pauses taken
    pub pauses: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl FetchStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            discovered: 0,
            attempted: 0,
            enriched: 0,
            dropped: HashMap::new(),
            batches: 0,
            pauses: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Counts one finished item
    pub fn record_outcome(&mut self, outcome: &ItemOutcome) {
        self.attempted += 1;
        match outcome {
            ItemOutcome::Enriched(_) => self.enriched += 1,
            ItemOutcome::Dropped(reason) => self.record_drop(reason),
        }
    }

    fn record_drop(&mut self, reason: &DropReason) {
        *self.dropped.entry(reason.label()).or_insert(0) += 1;
    }

    /// Total number of dropped items
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    /// Number of items dropped for the given reason label
    pub fn dropped_for(&self, label: &str) -> usize {
        self.dropped.get(label).copied().unwrap_or(0)
    }

    /// Folds another set of counts into this one
    pub fn merge(&mut self, other: &FetchStatistics) {
        self.attempted += other.attempted;
        self.enriched += other.enriched;
        for (label, count) in &other.dropped {
            *self.dropped.entry(*label).or_insert(0) += count;
        }
        self.batches += other.batches;
        self.pauses += other.pauses;
    }

    /// Marks the run as finished
    pub fn finish(&mut self, elapsed: Duration) {
        self.finished_at = Some(Utc::now());
        self.elapsed = elapsed;
    }
}

impl Default for FetchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &FetchStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!("  Object ids discovered: {}", stats.discovered);
    println!("  Objects attempted: {}", stats.attempted);
    println!("  Batches: {} ({} pauses)", stats.batches, stats.pauses);
    println!();

    if stats.total_dropped() > 0 {
        println!("Dropped Objects:");
        for label in DropReason::all_labels() {
            let count = stats.dropped_for(label);
            if count > 0 {
                println!("  {}: {}", label, count);
            }
        }
        println!();
    }

    let success_rate = if stats.attempted > 0 {
        (stats.enriched as f64 / stats.attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} objects enriched)",
        success_rate, stats.enriched, stats.attempted
    );
}
