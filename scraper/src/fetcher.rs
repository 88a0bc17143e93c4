//! Blocking HTTP fetching with retry and exponential backoff.

use crate::config::ProxyConfig;
use crate::error::{FetchFailure, Result, ScrapeError};
use log::{debug, error, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Proxy;
use std::thread;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";

/// Anything that can turn a URL into a page body.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Blocking pause, swappable so tests can observe waits instead of taking them.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            backoff_factor: 1.5,
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based): `backoff_factor^(attempt-1)` seconds.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        Duration::try_from_secs_f64(self.backoff_factor.powi(exponent)).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub user_agent: String,
    pub proxy: Option<ProxyConfig>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl FetchOptions {
    pub fn new(user_agent: impl Into<String>) -> Self {
        FetchOptions {
            user_agent: user_agent.into(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

pub struct Fetcher<S = ThreadSleeper> {
    client: Client,
    retry: RetryPolicy,
    sleeper: S,
}

impl Fetcher<ThreadSleeper> {
    pub fn new(options: &FetchOptions) -> Result<Self> {
        Self::with_sleeper(options, ThreadSleeper)
    }
}

impl<S: Sleeper> Fetcher<S> {
    pub fn with_sleeper(options: &FetchOptions, sleeper: S) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );
        match HeaderValue::from_str(&options.user_agent) {
            Ok(ua) => {
                headers.insert(USER_AGENT, ua);
            }
            Err(_) => warn!(
                "User-Agent '{}' is not a valid header value; sending none",
                options.user_agent
            ),
        }

        let mut builder = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers);

        if let Some(proxy) = &options.proxy {
            if let Some(url) = proxy.http.as_deref().filter(|u| !u.is_empty()) {
                builder = builder.proxy(Proxy::http(url).map_err(|source| ScrapeError::Proxy {
                    url: url.to_string(),
                    source,
                })?);
            }
            if let Some(url) = proxy.https.as_deref().filter(|u| !u.is_empty()) {
                builder = builder.proxy(Proxy::https(url).map_err(|source| ScrapeError::Proxy {
                    url: url.to_string(),
                    source,
                })?);
            }
        }

        let client = builder.build().map_err(ScrapeError::Client)?;

        Ok(Fetcher {
            client,
            retry: options.retry,
            sleeper,
        })
    }

    fn attempt(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }
        let body = response.text()?;
        debug!("Received response {} with {} bytes.", status, body.len());
        Ok(body)
    }

    /// GETs `url`, retrying transport errors and non-2xx statuses.
    pub fn fetch(&self, url: &str) -> Result<String> {
        let max_retries = self.retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("HTTP GET {} (attempt {}/{})", url, attempt, max_retries);

            let err = match self.attempt(url) {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            warn!(
                "Request to {} failed on attempt {}/{}: {}",
                url, attempt, max_retries, err
            );

            if attempt >= max_retries {
                error!("Failed to fetch {} after {} attempts", url, max_retries);
                return Err(ScrapeError::Fetch {
                    url: url.to_string(),
                    attempts: attempt,
                    source: err,
                });
            }

            let wait = self.retry.delay_after(attempt);
            debug!("Sleeping {:.2} seconds before retry.", wait.as_secs_f64());
            self.sleeper.sleep(wait);
        }
    }
}

impl<S: Sleeper> PageSource for Fetcher<S> {
    fn fetch_page(&self, url: &str) -> Result<String> {
        self.fetch(url)
    }
}
