//! Sequential query → location → platform loop.
//!
//! Every combination is fetched one at a time with a fixed pause after each
//! HTTP call. A failed combination is logged and recorded, never fatal; the
//! merged result is exported once at the end.

use crate::config::{InputConfig, Location, QueryConfig};
use crate::error::Result;
use crate::export::export_to_json;
use crate::fetcher::{FetchOptions, Fetcher, PageSource, Sleeper, ThreadSleeper};
use crate::merge::merge_dedup;
use crate::sites::{self, SearchParams};
use common::{JobRecord, Source};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A (query, location, platform) combination that produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboFailure {
    pub query: String,
    pub city: String,
    pub country: String,
    pub platform: Source,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// HTTP fetches issued, one per combination (retries not counted).
    pub requests: usize,
    /// Records gathered before de-duplication.
    pub collected: usize,
    pub unique: usize,
    pub cards_skipped: usize,
    pub failures: Vec<ComboFailure>,
    /// Where output was written; `None` when the run had nothing to export.
    pub output: Option<PathBuf>,
}

pub struct Pipeline<'a, P, S> {
    source: &'a P,
    sleeper: &'a S,
    request_delay: Duration,
}

impl<'a, P: PageSource, S: Sleeper> Pipeline<'a, P, S> {
    pub fn new(source: &'a P, sleeper: &'a S, request_delay: Duration) -> Self {
        Pipeline {
            source,
            sleeper,
            request_delay,
        }
    }

    /// Scrapes every combination, merges, and exports to `output_path`.
    /// Nothing is written when there are no queries or no records.
    pub fn run(&self, queries: &[QueryConfig], output_path: &Path) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if queries.is_empty() {
            warn!("No queries provided in configuration. Nothing to do.");
            return Ok(summary);
        }

        let collected = self.collect(queries, &mut summary);
        if collected.is_empty() {
            warn!("No jobs collected. Nothing to export.");
            return Ok(summary);
        }

        info!(
            "Merging and de-duplicating {} collected job records.",
            collected.len()
        );
        let merged = merge_dedup(collected);
        summary.unique = merged.len();
        info!(
            "After de-duplication, {} unique job records remain.",
            merged.len()
        );

        export_to_json(&merged, output_path)?;
        info!("Export completed to {}", output_path.display());
        summary.output = Some(output_path.to_path_buf());
        Ok(summary)
    }

    /// Runs every combination and returns all records in scrape order.
    pub fn collect(&self, queries: &[QueryConfig], summary: &mut RunSummary) -> Vec<JobRecord> {
        let mut all_results = Vec::new();

        for query in queries {
            let keyword = query.keyword();
            if keyword.is_empty() {
                warn!("Skipping query without title/keyword: {:?}", query);
                continue;
            }
            if query.locations.is_empty() {
                warn!("Query '{}' has no locations. Skipping.", keyword);
                continue;
            }

            let platforms = query.platforms();
            let job_types = query.job_types();
            let remote_flags = query.remote_flags();
            info!(
                "Processing query '{}' for {} locations on platforms: {}",
                keyword,
                query.locations.len(),
                platforms
                    .iter()
                    .map(|p| p.key())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            for location in &query.locations {
                info!(
                    "Location: city='{}', country='{}'",
                    location.city, location.country
                );
                let params = SearchParams {
                    keyword,
                    city: &location.city,
                    country: &location.country,
                    job_types: &job_types,
                    remote_flags: &remote_flags,
                };

                for &platform in &platforms {
                    let records =
                        self.scrape_one(platform, &params, query.max_results, location, summary);
                    all_results.extend(records);
                }
            }
        }

        summary.collected = all_results.len();
        all_results
    }

    fn scrape_one(
        &self,
        platform: Source,
        params: &SearchParams<'_>,
        max_results: usize,
        location: &Location,
        summary: &mut RunSummary,
    ) -> Vec<JobRecord> {
        let url = sites::search_url(platform, params);
        info!("{} search URL: {}", platform, url);

        let records = match self.source.fetch_page(&url) {
            Ok(html) => {
                let report = sites::extract_jobs(platform, &html, max_results);
                info!(
                    "Parsed {} {} jobs for '{}' in {}, {}",
                    report.records.len(),
                    platform,
                    params.keyword,
                    location.city,
                    location.country
                );
                summary.cards_skipped += report.skipped.len();
                report.records
            }
            Err(e) => {
                let message = e.chain();
                error!(
                    "Failed to scrape {} for '{}': {}",
                    platform, params.keyword, message
                );
                summary.failures.push(ComboFailure {
                    query: params.keyword.to_string(),
                    city: location.city.clone(),
                    country: location.country.clone(),
                    platform,
                    error: message,
                });
                Vec::new()
            }
        };

        summary.requests += 1;
        if !self.request_delay.is_zero() {
            debug!(
                "Sleeping {:.2} seconds between requests.",
                self.request_delay.as_secs_f64()
            );
            self.sleeper.sleep(self.request_delay);
        }
        records
    }
}

/// Loads `input_path`, scrapes everything it describes and writes `output_path`.
pub fn run_scraper(input_path: &Path, output_path: &Path) -> Result<RunSummary> {
    let config = InputConfig::load(input_path)?;
    debug!("Loaded input configuration: {:?}", config);

    if config.queries.is_empty() {
        warn!("No queries provided in configuration. Nothing to do.");
        return Ok(RunSummary::default());
    }

    let mut options = FetchOptions::new(config.user_agent());
    options.proxy = config.proxy.clone();
    let fetcher = Fetcher::new(&options)?;

    Pipeline::new(&fetcher, &ThreadSleeper, config.request_delay())
        .run(&config.queries, output_path)
}
