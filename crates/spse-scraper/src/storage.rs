//! JSON persistence of a run's results.

use std::path::{Path, PathBuf};

use crate::types::{ProcurementRecord, ScrapeResult};

/// Writes result sequences into a configured directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File name for an organization: whitespace runs collapsed, `.json` added.
    pub fn file_name(organization: &str) -> String {
        let mut name = String::with_capacity(organization.len() + 5);
        let mut prev_space = false;
        for ch in organization.chars() {
            if ch.is_whitespace() {
                if !prev_space {
                    name.push(' ');
                }
                prev_space = true;
            } else {
                name.push(ch);
                prev_space = false;
            }
        }
        name.push_str(".json");
        name
    }

    /// Write `records` as pretty JSON and return the file path.
    pub fn write(
        &self,
        organization: &str,
        records: &[ProcurementRecord],
    ) -> ScrapeResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(Self::file_name(organization));
        let payload = serde_json::to_vec_pretty(records)?;
        std::fs::write(&path, payload)?;
        tracing::info!("saved {} records to {}", records.len(), path.display());
        Ok(path)
    }

    /// Read back a previously written result file.
    pub fn read(path: &Path) -> ScrapeResult<Vec<ProcurementRecord>> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
