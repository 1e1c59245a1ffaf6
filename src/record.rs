//! Record types flowing through a harvest run
//!
//! Metadata responses are schema-less documents; they are kept as a generic
//! JSON map until the item fetcher turns them into a typed [`EnrichedRecord`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of one remote collection object
pub type ObjectId = u64;

/// Decoded body of a metadata response, with no schema imposed
pub type RawRecord = Map<String, Value>;

/// Records that survived processing, in completion order
pub type ResultCollection = Vec<EnrichedRecord>;

/// Metadata field holding the public detail page URL
pub const OBJECT_URL_FIELD: &str = "objectURL";

/// Metadata field holding the object id
pub const OBJECT_ID_FIELD: &str = "objectID";

/// A metadata record augmented with fields scraped from its detail page
///
/// Serializes as the original metadata document with `galleryLink` and
/// `itemDescription` added next to the upstream fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Upstream metadata fields, untouched
    #[serde(flatten)]
    pub metadata: RawRecord,

    /// Gallery location link; empty when the page had none
    #[serde(rename = "galleryLink", default)]
    pub gallery_link: String,

    /// Descriptive text from the detail page; never empty
    #[serde(rename = "itemDescription")]
    pub item_description: String,
}

impl EnrichedRecord {
    /// Builds a record from raw metadata and scraped fields
    ///
    /// Returns `None` when the description is blank; a record without a
    /// description is not usable output.
    pub fn new(
        mut metadata: RawRecord,
        gallery_link: Option<String>,
        item_description: String,
    ) -> Option<Self> {
        let item_description = item_description.trim().to_string();
        if item_description.is_empty() {
            return None;
        }

        // The augmented keys are owned by this struct; keep them out of the
        // flattened map so they serialize exactly once.
        metadata.shift_remove("galleryLink");
        metadata.shift_remove("itemDescription");

        Some(Self {
            metadata,
            gallery_link: gallery_link.unwrap_or_default(),
            item_description,
        })
    }

    /// The upstream object id, if the metadata carried one
    pub fn object_id(&self) -> Option<ObjectId> {
        self.metadata.get(OBJECT_ID_FIELD).and_then(Value::as_u64)
    }
}

/// Reads the detail page URL out of raw metadata
///
/// Blank or non-string values count as absent.
pub fn object_url(metadata: &RawRecord) -> Option<&str> {
    metadata
        .get(OBJECT_URL_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
