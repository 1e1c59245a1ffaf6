//! State module for tracking item outcomes
//!
//! # Components
//!
//! - `FetchFailure`: Classified reason one network call failed
//! - `DropReason`: Why an item was left out of the results
//! - `ItemOutcome`: The enriched record or the reason it was dropped

mod item_state;

// Re-export main types
pub use item_state::{DropReason, FetchFailure, ItemOutcome};
