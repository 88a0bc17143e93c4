use crate::error::{Result, ScrapeError};
use common::JobRecord;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Writes `jobs` as a pretty-printed JSON array, replacing any existing file.
pub fn export_to_json(jobs: &[JobRecord], output_path: &Path) -> Result<()> {
    debug!(
        "Preparing to export {} jobs to {}",
        jobs.len(),
        output_path.display()
    );

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ScrapeError::ExportIo {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json_output = serde_json::to_string_pretty(jobs)?;
    fs::write(output_path, json_output).map_err(|source| ScrapeError::ExportIo {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} job records to {}", jobs.len(), output_path.display());
    Ok(())
}
