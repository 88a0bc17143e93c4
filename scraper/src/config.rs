//! Input configuration file.
//!
//! ```json
//! {
//!   "queries": [
//!     {
//!       "title": "Rust Developer",
//!       "locations": [{ "city": "Berlin", "country": "Germany" }],
//!       "platforms": ["indeed", "linkedin"],
//!       "job_types": ["full-time"],
//!       "remote": ["yes"],
//!       "max_results": 25
//!     }
//!   ],
//!   "proxy": { "http": "http://127.0.0.1:8080", "https": "http://127.0.0.1:8080" },
//!   "request_delay_seconds": 1.5,
//!   "user_agent": "Mozilla/5.0 ..."
//! }
//! ```

use crate::error::{Result, ScrapeError};
use common::Source;
use log::warn;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
pub const DEFAULT_MAX_RESULTS: usize = 50;
const DEFAULT_REQUEST_DELAY_SECS: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub queries: Vec<QueryConfig>,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    #[serde(default = "default_request_delay")]
    pub request_delay_seconds: f64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    pub http: Option<String>,
    pub https: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,
    #[serde(default = "default_platforms", deserialize_with = "null_as_all_platforms")]
    pub platforms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remote: Vec<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_request_delay() -> f64 {
    DEFAULT_REQUEST_DELAY_SECS
}

fn default_platforms() -> Vec<String> {
    Source::ALL.iter().map(|s| s.key().to_string()).collect()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// An explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_all_platforms<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_else(default_platforms))
}

impl InputConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScrapeError::ConfigMissing(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| ScrapeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ScrapeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pause after every HTTP call. Negative or non-finite values mean no pause.
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_seconds).unwrap_or_default()
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl QueryConfig {
    /// Search keyword: `title`, falling back to `keyword`. Empty when neither is set.
    pub fn keyword(&self) -> &str {
        [self.title.as_deref(), self.keyword.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|k| !k.is_empty())
            .unwrap_or("")
    }

    /// Enabled platforms in a fixed order (Indeed, then LinkedIn).
    pub fn platforms(&self) -> Vec<Source> {
        let mut wanted = Vec::new();
        for name in &self.platforms {
            match name.parse::<Source>() {
                Ok(source) => wanted.push(source),
                Err(e) => warn!("Ignoring {} in query '{}'", e, self.keyword()),
            }
        }
        Source::ALL
            .into_iter()
            .filter(|s| wanted.contains(s))
            .collect()
    }

    pub fn job_types(&self) -> Vec<String> {
        lowered(&self.job_types)
    }

    pub fn remote_flags(&self) -> Vec<String> {
        lowered(&self.remote)
    }
}

fn lowered(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}
