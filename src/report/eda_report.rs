//! JSON export of the analysis results

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{Analysis, AnalysisConfig};

/// File name of the JSON report inside the output directory
pub const REPORT_FILE_NAME: &str = "eda_report.json";

/// Metadata about the analysis run
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// Sommelier version
    pub sommelier_version: String,
    /// Input file path
    pub input_file: String,
    /// Number of observations
    pub rows: usize,
    /// Settings used for the analysis steps
    pub config: AnalysisConfig,
}

/// Complete export of one analysis run
#[derive(Debug, Serialize)]
pub struct EdaReport<'a> {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
    /// Chart files written during the run, relative to the output directory
    pub charts: Vec<String>,
}

impl<'a> EdaReport<'a> {
    pub fn new(
        input_file: &Path,
        rows: usize,
        config: &AnalysisConfig,
        analysis: &'a Analysis,
        charts: &[PathBuf],
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                sommelier_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: input_file.display().to_string(),
                rows,
                config: config.clone(),
            },
            analysis,
            charts: charts
                .iter()
                .filter_map(|p| p.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Write the report as pretty-printed JSON
pub fn export_report(report: &EdaReport, output_path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(report).context("Failed to serialize analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}
