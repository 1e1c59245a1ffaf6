//! Harvest orchestrator - end-to-end run logic
//!
//! This module drives a whole run:
//! - Opening the HTTP session
//! - Discovering the object id set
//! - Handing the ids to the batch scheduler
//! - Writing the result document and reporting the count
//!
//! Only a failed id discovery (or a local failure such as an unwritable
//! output path) aborts a run. Item failures never reach this level.

use crate::config::Config;
use crate::fetcher::item::MuseumItemFetcher;
use crate::fetcher::scheduler::BatchScheduler;
use crate::fetcher::session::{ApiEndpoints, ClientSession};
use crate::output::{write_results, FetchStatistics};
use crate::record::ObjectId;
use crate::HarvestError;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

/// Field of the listing response holding the id array
const OBJECT_IDS_FIELD: &str = "objectIDs";

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Where the result document was written
    pub results_path: PathBuf,

    /// Counts for the whole run
    pub stats: FetchStatistics,
}

impl RunSummary {
    /// Number of records written
    pub fn fetched(&self) -> usize {
        self.stats.enriched
    }
}

/// Main harvest orchestrator
pub struct Orchestrator {
    config: Config,
    limit: Option<usize>,
}

impl Orchestrator {
    /// Creates an orchestrator for the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            limit: None,
        }
    }

    /// Processes only the first `limit` discovered ids
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Runs the harvest
    ///
    /// The session is dropped before this returns on every path, which
    /// closes its pooled connections. When discovery fails no output file is
    /// written.
    pub async fn run(&self) -> Result<RunSummary, HarvestError> {
        let start_time = Instant::now();
        let mut stats = FetchStatistics::new();

        let session = ClientSession::open(&self.config.http, &self.config.user_agent)?;
        let endpoints = ApiEndpoints::new(&self.config.api)?;

        let mut ids = discover_object_ids(&session, &endpoints).await?;
        stats.discovered = ids.len();
        tracing::info!("Discovered {} object ids", ids.len());

        if let Some(limit) = self.limit {
            if ids.len() > limit {
                tracing::info!("Limiting run to the first {} object ids", limit);
                ids.truncate(limit);
            }
        }

        let scheduler = BatchScheduler::new(&self.config.fetcher);
        tracing::info!(
            "Fetching {} objects in {} batches of up to {} ({} concurrent, {:?} between batches)",
            ids.len(),
            scheduler.batch_count(ids.len()),
            self.config.fetcher.batch_size,
            scheduler.max_concurrent(),
            self.config.fetcher.batch_delay()
        );

        let fetcher = MuseumItemFetcher::new(&session, &endpoints);
        let report = scheduler.run(&fetcher, &ids).await;
        session.close();

        stats.merge(&report.stats);

        let results_path = PathBuf::from(&self.config.output.results_path);
        write_results(&results_path, &report.records)?;
        stats.finish(start_time.elapsed());

        tracing::info!(
            "Fetched {} objects ({} dropped) in {:?}, written to {}",
            stats.enriched,
            stats.total_dropped(),
            stats.elapsed,
            results_path.display()
        );

        Ok(RunSummary {
            results_path,
            stats,
        })
    }
}

/// Fetches the full id set from the listing endpoint
///
/// Any failure here is fatal to the run. A listing whose `objectIDs` is
/// `null` is the upstream's way of reporting zero matches and yields an empty
/// set; a missing or malformed field is a failure.
pub async fn discover_object_ids(
    session: &ClientSession,
    endpoints: &ApiEndpoints,
) -> Result<Vec<ObjectId>, HarvestError> {
    let url = endpoints.listing()?;
    tracing::info!("Discovering object ids from {}", url);

    let discovery_error = |reason: String| {
        tracing::error!("Failed to fetch object ids from {}: {}", url, reason);
        HarvestError::Discovery {
            url: url.to_string(),
            reason,
        }
    };

    let listing: Value = session
        .get_json(url.as_str())
        .await
        .map_err(|failure| discovery_error(failure.to_string()))?;

    match listing.get(OBJECT_IDS_FIELD) {
        Some(Value::Null) => Ok(Vec::new()),
        Some(ids) => serde_json::from_value(ids.clone())
            .map_err(|e| discovery_error(format!("malformed {}: {}", OBJECT_IDS_FIELD, e))),
        None => Err(discovery_error(format!(
            "response has no {} field",
            OBJECT_IDS_FIELD
        ))),
    }
}

/// Runs a complete harvest with the given configuration
///
/// # Example
///
/// ```no_run
/// use met_harvest::config::Config;
/// use met_harvest::fetcher::run_harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_harvest(Config::default()).await?;
/// println!("Fetched {} objects", summary.fetched());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<RunSummary, HarvestError> {
    Orchestrator::new(config).run().await
}
