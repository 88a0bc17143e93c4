//! Indeed + LinkedIn job postings scraper
//!
//! Builds search URLs per board, fetches result pages with retry and
//! backoff, extracts listing cards into [`common::JobRecord`]s, merges and
//! de-duplicates them, and exports a JSON array.

pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod logger;
pub mod merge;
pub mod pipeline;
pub mod sites;

pub use config::{InputConfig, QueryConfig};
pub use error::{Result, ScrapeError};
pub use fetcher::{Fetcher, PageSource, RetryPolicy};
pub use pipeline::{run_scraper, Pipeline, RunSummary};
