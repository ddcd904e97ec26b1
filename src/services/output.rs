use crate::domain::ScrapeReport;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes `report` as pretty JSON to `path`, or to stdout when `None`.
pub fn write_report<T: Serialize>(report: &ScrapeReport<T>, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    match path {
        Some(path) => {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() && !dir.exists() {
                    std::fs::create_dir_all(dir)?;
                }
            }
            std::fs::write(path, json)?;
            info!("Wrote {} records to {}", report.total_records, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
