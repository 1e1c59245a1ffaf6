//! Output module for harvest results
//!
//! This module handles:
//! - Writing the result collection as one indented JSON document
//! - Reading a result document back
//! - Recording run statistics

mod json;
pub mod stats;

pub use json::{read_results, write_results};
pub use stats::{print_statistics, FetchStatistics};
