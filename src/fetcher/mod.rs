//! Fetcher module for collection harvesting
//!
//! This module contains the core fetch logic, including:
//! - The run-scoped HTTP session
//! - Detail page field extraction
//! - Per-object metadata and detail page fetching
//! - Batch scheduling with a concurrency gate and inter-batch pauses
//! - Overall run orchestration

mod extractor;
mod item;
mod orchestrator;
mod scheduler;
mod session;

pub use extractor::{extract_detail_page, DetailPage};
pub use item::{ItemFetcher, MuseumItemFetcher};
pub use orchestrator::{discover_object_ids, run_harvest, Orchestrator, RunSummary};
pub use scheduler::{BatchScheduler, ScheduleReport};
pub use session::{build_http_client, ApiEndpoints, ClientSession};
