//! Outcome definitions for a single item's fetch
//!
//! Every item ends in exactly one [`ItemOutcome`]. Failures carry a
//! classified reason for the run log and statistics.

use crate::record::EnrichedRecord;
use std::fmt;

/// Why one network call didn't produce a usable body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Server answered with a non-200 status
    Status(u16),

    /// Connect or total timeout elapsed
    Timeout,

    /// Connection could not be established
    Connect,

    /// Body could not be read or decoded
    Decode(String),

    /// Any other transport-level failure
    Transport(String),
}

impl FetchFailure {
    /// Classifies a reqwest error the same way for every call site
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }

    /// Returns true if the server was reached and answered
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect => write!(f, "connection failed"),
            Self::Decode(e) => write!(f, "decode error: {}", e),
            Self::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

/// Why an item contributes nothing to the result collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The metadata call failed
    MetadataFailed(FetchFailure),

    /// The metadata carried no detail page URL
    MissingObjectUrl,

    /// The detail page call failed
    DetailPageFailed(FetchFailure),

    /// The detail page had no usable description
    MissingDescription,
}

impl DropReason {
    /// Stable short label, used as the statistics key
    pub fn label(&self) -> &'static str {
        match self {
            Self::MetadataFailed(_) => "metadata_failed",
            Self::MissingObjectUrl => "missing_object_url",
            Self::DetailPageFailed(_) => "detail_page_failed",
            Self::MissingDescription => "missing_description",
        }
    }

    /// Returns all labels in reporting order
    pub fn all_labels() -> [&'static str; 4] {
        [
            "metadata_failed",
            "missing_object_url",
            "detail_page_failed",
            "missing_description",
        ]
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetadataFailed(e) => write!(f, "metadata request failed: {}", e),
            Self::MissingObjectUrl => write!(f, "no objectURL found"),
            Self::DetailPageFailed(e) => write!(f, "detail page request failed: {}", e),
            Self::MissingDescription => write!(f, "no description found"),
        }
    }
}

/// Final result of processing one item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Enriched(EnrichedRecord),
    Dropped(DropReason),
}

impl ItemOutcome {
    /// Returns true if the item produced a record
    pub fn is_enriched(&self) -> bool {
        matches!(self, Self::Enriched(_))
    }

    /// Consumes the outcome, keeping only the record
    pub fn into_record(self) -> Option<EnrichedRecord> {
        match self {
            Self::Enriched(record) => Some(record),
            Self::Dropped(_) => None,
        }
    }
}
