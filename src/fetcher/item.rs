//! Single-item fetcher
//!
//! Processes one collection object end to end:
//! 1. GET the object's metadata
//! 2. Read its detail page URL (`objectURL`)
//! 3. GET the detail page
//! 4. Extract the gallery link and description
//! 5. Merge them into an [`EnrichedRecord`]
//!
//! Nothing here returns an error. Each failure becomes a [`DropReason`] and a
//! log line, so one bad item never disturbs the rest of its batch.

use crate::fetcher::extractor::extract_detail_page;
use crate::fetcher::session::{ApiEndpoints, ClientSession};
use crate::record::{object_url, EnrichedRecord, ObjectId, RawRecord};
use crate::state::{DropReason, FetchFailure, ItemOutcome};
use std::future::Future;

/// Produces the outcome of one work item
///
/// The batch scheduler drives any implementation of this trait, which keeps
/// scheduling testable without a network.
pub trait ItemFetcher {
    fn fetch(&self, id: ObjectId) -> impl Future<Output = ItemOutcome>;
}

/// Fetches objects from the collection API over a shared session
pub struct MuseumItemFetcher<'a> {
    session: &'a ClientSession,
    endpoints: &'a ApiEndpoints,
}

impl<'a> MuseumItemFetcher<'a> {
    pub fn new(session: &'a ClientSession, endpoints: &'a ApiEndpoints) -> Self {
        Self { session, endpoints }
    }

    async fn try_fetch(&self, id: ObjectId) -> Result<EnrichedRecord, DropReason> {
        let metadata_url = self
            .endpoints
            .object(id)
            .map_err(|e| DropReason::MetadataFailed(FetchFailure::Transport(e.to_string())))?;

        tracing::debug!("Object {}: fetching metadata from {}", id, metadata_url);
        let metadata: RawRecord = self
            .session
            .get_json(metadata_url.as_str())
            .await
            .map_err(DropReason::MetadataFailed)?;

        let page_url = object_url(&metadata)
            .ok_or(DropReason::MissingObjectUrl)?
            .to_string();

        let html = self
            .session
            .get_text(&page_url)
            .await
            .map_err(DropReason::DetailPageFailed)?;

        let page = extract_detail_page(&html);

        match &page.gallery_link {
            Some(link) => tracing::info!("Object {}: Gallery link found: {}", id, link),
            None => tracing::info!("Object {}: Gallery link not found", id),
        }

        let description = page.description.ok_or(DropReason::MissingDescription)?;
        tracing::info!("Object {}: Description found: {}", id, description);

        EnrichedRecord::new(metadata, page.gallery_link, description)
            .ok_or(DropReason::MissingDescription)
    }
}

impl ItemFetcher for MuseumItemFetcher<'_> {
    async fn fetch(&self, id: ObjectId) -> ItemOutcome {
        match self.try_fetch(id).await {
            Ok(record) => ItemOutcome::Enriched(record),
            Err(reason) => {
                log_drop(id, &reason);
                ItemOutcome::Dropped(reason)
            }
        }
    }
}

/// Logs a dropped item at the level its cause deserves
///
/// Non-200 answers are warnings, transport failures are errors, and missing
/// fields are informational.
fn log_drop(id: ObjectId, reason: &DropReason) {
    match reason {
        DropReason::MetadataFailed(failure) | DropReason::DetailPageFailed(failure) => {
            if failure.is_status() {
                tracing::warn!("Object {}: {}", id, reason);
            } else {
                tracing::error!("Object {}: {}", id, reason);
            }
        }
        DropReason::MissingObjectUrl | DropReason::MissingDescription => {
            tracing::info!("Object {}: {}", id, reason);
        }
    }
}
