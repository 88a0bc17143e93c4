//! Shared job record model
//!
//! Every extractor produces `JobRecord`s and the exporter writes them out
//! unchanged, so the serialized field names here are the output format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job board a record was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Indeed,
    LinkedIn,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Indeed, Source::LinkedIn];

    /// Lower-case name used in input configuration files.
    pub fn key(self) -> &'static str {
        match self {
            Source::Indeed => "indeed",
            Source::LinkedIn => "linkedin",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Indeed => f.write_str("Indeed"),
            Source::LinkedIn => f.write_str("LinkedIn"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSource(pub String);

impl fmt::Display for UnknownSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform '{}'", self.0)
    }
}

impl std::error::Error for UnknownSource {}

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indeed" => Ok(Source::Indeed),
            "linkedin" => Ok(Source::LinkedIn),
            _ => Err(UnknownSource(s.to_string())),
        }
    }
}

/// Employment type as advertised on a listing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    /// Detects a job type mentioned in lower-cased badge text.
    /// Full-time takes precedence when a badge names several.
    pub fn detect(lower: &str) -> Option<JobType> {
        if lower.contains("full-time") || lower.contains("full time") {
            Some(JobType::FullTime)
        } else if lower.contains("part-time") || lower.contains("part time") {
            Some(JobType::PartTime)
        } else if lower.contains("contract") {
            Some(JobType::Contract)
        } else if lower.contains("internship") {
            Some(JobType::Internship)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remote {
    Yes,
    No,
    #[default]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub jobtype: Option<JobType>,
    pub remote: Remote,
    pub posted_date: NaiveDate,
    /// Absolute listing URL, or empty when the card had none.
    pub link: String,
    pub description: String,
    pub salary: Option<String>,
    pub source: Source,
}

impl JobRecord {
    /// A record with no title, company or link carries nothing worth keeping.
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.company.is_empty() && self.link.is_empty()
    }
}
