//! @ai:module:intent Report generation for analysis results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, ChartGenerator, TableRenderer

pub mod charts;
pub mod json_report;
pub mod markdown_report;
pub mod table;

pub use charts::{ChartGenerator, ChartGeneratorTrait, MethodBar};
pub use json_report::{JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};
pub use table::TableRenderer;

use crate::summary::ExecutiveSummary;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const JSON_REPORT_FILE: &str = "analysis.json";
pub const MARKDOWN_REPORT_FILE: &str = "analysis.md";

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            charts: ChartGenerator::new(),
        }
    }

    /// @ai:intent Generate all reports; returns the written file paths
    /// @ai:post chart failures are logged and do not fail the call
    /// @ai:effects fs:write
    pub fn generate_all(
        &self,
        summary: &ExecutiveSummary,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_dir)?;

        let json_path = output_dir.join(JSON_REPORT_FILE);
        let markdown_path = output_dir.join(MARKDOWN_REPORT_FILE);

        self.json.generate(summary, &json_path)?;
        self.markdown.generate(summary, &markdown_path)?;

        let mut written = vec![json_path, markdown_path];

        // Charts need system fonts, which headless hosts may lack.
        match self.charts.generate_all(&summary.raw_analysis, output_dir) {
            Ok(charts) => written.extend(charts.into_iter().map(|c| output_dir.join(c))),
            Err(e) => tracing::warn!("Chart generation skipped: {}", e),
        }

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(written)
    }

    /// @ai:intent Load a summary previously written as JSON
    /// @ai:effects fs:read
    pub fn load_summary(&self, path: &Path) -> Result<ExecutiveSummary> {
        self.json.load(path)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
