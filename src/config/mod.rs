//! Configuration module for Met-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every value has a default, so running without a file
//! is equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use met_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Batch size: {}", config.fetcher.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, FetcherConfig, HttpConfig, LogRotation, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
