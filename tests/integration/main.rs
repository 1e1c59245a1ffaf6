//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the collection API and its
//! detail pages, and exercise the item fetcher and full runs end-to-end.

mod common;
mod item_tests;
mod run_tests;
