//! Indeed + LinkedIn Job Postings Scraper
//!
//! Reads search queries from a JSON config, scrapes both boards
//! and saves the merged listings to a JSON file.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use job_scraper::{logger, run_scraper};
use log::{info, LevelFilter};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "job-scraper", version, about = "Indeed + LinkedIn Job Postings Scraper")]
struct Cli {
    #[arg(
        short,
        long,
        default_value = "data/inputs.sample.json",
        help = "Path to input configuration JSON"
    )]
    input: PathBuf,
    #[arg(
        short,
        long,
        default_value = "data/sample_output.json",
        help = "Path to output JSON file"
    )]
    output: PathBuf,
    #[arg(
        short,
        long,
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Info,
        help = "Logging level"
    )]
    log_level: LogLevel,
}

fn resolve(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level.into());

    let input_path = resolve(&cli.input)?;
    let output_path = resolve(&cli.output)?;
    info!("Using input config: {}", input_path.display());
    info!("Output will be written to: {}", output_path.display());

    let summary = run_scraper(&input_path, &output_path)
        .with_context(|| format!("Scrape run from {} failed", input_path.display()))?;

    info!("Total HTTP request sessions: {}", summary.requests);
    if !summary.failures.is_empty() {
        info!(
            "{} of {} searches failed; see errors above.",
            summary.failures.len(),
            summary.requests
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["job-scraper"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("data/inputs.sample.json"));
        assert_eq!(cli.output, PathBuf::from("data/sample_output.json"));
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn test_log_level_values() {
        let cli = Cli::try_parse_from(["job-scraper", "--log-level", "WARNING"]).unwrap();
        assert_eq!(LevelFilter::from(cli.log_level), LevelFilter::Warn);

        let cli = Cli::try_parse_from(["job-scraper", "-l", "debug", "-i", "in.json"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.input, PathBuf::from("in.json"));

        assert!(Cli::try_parse_from(["job-scraper", "--log-level", "TRACE"]).is_err());
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let absolute = env::temp_dir().join("jobs.json");
        assert_eq!(resolve(&absolute).unwrap(), absolute);
        assert!(resolve(Path::new("data/x.json")).unwrap().is_absolute());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
