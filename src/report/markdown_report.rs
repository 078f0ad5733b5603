//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::AnalysisReport;
use crate::summary::{Achievement, ExecutiveSummary};
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

const NOT_AVAILABLE: &str = "n/a";

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a summary
    fn generate(&self, summary: &ExecutiveSummary, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from executive summaries
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format an optional value, "n/a" when undefined
    /// @ai:effects pure
    fn format_optional(value: Option<f64>, suffix: &str) -> String {
        value
            .map(|v| format!("{}{}", v, suffix))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// @ai:intent Generate header section
    /// @ai:effects pure
    fn generate_header(summary: &ExecutiveSummary) -> String {
        let mut output = String::new();
        let report = &summary.raw_analysis;

        writeln!(output, "# Brain Performance Analysis").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", summary.timestamp).unwrap();
        writeln!(output, "**Records:** {}", report.record_count).unwrap();
        writeln!(output, "**Observations:** {}", report.observation_count).unwrap();

        if let Some(comparison) = &report.comparison {
            writeln!(
                output,
                "**Comparison:** {} (candidate) vs {} (baseline)",
                comparison.candidate, comparison.baseline
            )
            .unwrap();
        }

        writeln!(output).unwrap();

        if let Some(error) = &summary.error {
            writeln!(output, "> {}", error).unwrap();
            writeln!(output).unwrap();
        }

        output
    }

    /// @ai:intent Generate per-method table in ranking order
    /// @ai:effects pure
    fn generate_method_table(report: &AnalysisReport) -> String {
        let mut output = String::new();

        if report.rankings.is_empty() {
            return output;
        }

        writeln!(output, "## Methods").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Rank | Method | Queries | Avg Response (ms) | Avg Cost (USD) | Avg Quality | Avg Satisfaction |"
        )
        .unwrap();
        writeln!(
            output,
            "|------|--------|---------|-------------------|----------------|-------------|------------------|"
        )
        .unwrap();

        for ranking in &report.rankings {
            let (count, satisfaction) = report
                .aggregate(ranking.method)
                .map(|a| {
                    (
                        a.count.to_string(),
                        Self::format_optional(a.mean_user_satisfaction, ""),
                    )
                })
                .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()));

            writeln!(
                output,
                "| {} | {} | {} | {:.2} | {:.6} | {:.3} | {} |",
                ranking.rank,
                ranking.method,
                count,
                ranking.mean_response_time_ms,
                ranking.mean_cost_usd,
                ranking.mean_quality_score,
                satisfaction
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate derived factor section
    /// @ai:effects pure
    fn generate_factors(report: &AnalysisReport) -> String {
        let mut output = String::new();

        writeln!(output, "## Derived Factors").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Factor | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(
            output,
            "| Performance improvement | {} |",
            Self::format_optional(report.performance_improvement_factor, "x")
        )
        .unwrap();
        writeln!(
            output,
            "| Cost reduction | {} |",
            Self::format_optional(report.cost_reduction_factor, "x")
        )
        .unwrap();
        writeln!(
            output,
            "| Quality improvement | {} |",
            Self::format_optional(report.quality_improvement_percent, "%")
        )
        .unwrap();
        writeln!(output).unwrap();

        if !report.issues.is_empty() {
            writeln!(output, "### Issues").unwrap();
            writeln!(output).unwrap();

            for issue in &report.issues {
                writeln!(output, "- {}", issue).unwrap();
            }

            writeln!(output).unwrap();
        }

        output
    }

    /// @ai:intent Generate a labelled list section
    /// @ai:effects pure
    fn generate_achievements(title: &str, items: &[Achievement]) -> String {
        let mut output = String::new();

        if items.is_empty() {
            return output;
        }

        writeln!(output, "## {}", title).unwrap();
        writeln!(output).unwrap();

        for item in items {
            writeln!(output, "- **{}:** {}", item.label, item.value).unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate recommendations and ROI section
    /// @ai:effects pure
    fn generate_recommendations(summary: &ExecutiveSummary) -> String {
        let mut output = String::new();

        if summary.strategic_recommendations.is_empty() {
            return output;
        }

        writeln!(output, "## Strategic Recommendations").unwrap();
        writeln!(output).unwrap();

        for (i, rec) in summary.strategic_recommendations.iter().enumerate() {
            writeln!(output, "{}. {}", i + 1, rec).unwrap();
        }

        writeln!(output).unwrap();
        writeln!(
            output,
            "_ROI is min(performance x cost x {}, {}%), a fixed business heuristic._",
            summary.roi_policy.multiplier, summary.roi_policy.cap_percent
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Render the full Markdown document
    /// @ai:effects pure
    pub fn render(&self, summary: &ExecutiveSummary) -> String {
        let report = &summary.raw_analysis;
        let mut content = String::new();

        content.push_str(&Self::generate_header(summary));
        content.push_str(&Self::generate_method_table(report));
        content.push_str(&Self::generate_factors(report));
        content.push_str(&Self::generate_achievements(
            "Key Achievements",
            &summary.key_achievements,
        ));
        content.push_str(&Self::generate_achievements(
            "Business Impact",
            &summary.business_impact,
        ));
        content.push_str(&Self::generate_recommendations(summary));

        content
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, summary: &ExecutiveSummary, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.render(summary))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        ComparisonMode, MetricRecord, MetricsAggregator, MetricsAggregatorTrait, ProcessingMethod,
    };
    use crate::summary::RoiPolicy;
    use tempfile::TempDir;

    fn scenario_summary() -> ExecutiveSummary {
        let records = vec![
            MetricRecord::new(ProcessingMethod::Rag, 500.0, 0.002, 0.95).with_satisfaction(5),
            MetricRecord::new(ProcessingMethod::Rag, 700.0, 0.003, 0.90).with_satisfaction(4),
            MetricRecord::new(ProcessingMethod::ContextDump, 3000.0, 0.02, 0.80)
                .with_satisfaction(3),
        ];
        let report = MetricsAggregator::new().analyze(&records, ComparisonMode::default());
        ExecutiveSummary::build(&report, RoiPolicy::default(), "2026-01-19T00:00:00Z".to_string())
    }

    #[test]
    fn test_generate_markdown_report() {
        let reporter = MarkdownReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("analysis.md");

        reporter.generate(&scenario_summary(), &output).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();

        assert!(content.contains("# Brain Performance Analysis"));
        assert!(content.contains("| 1 | RAG | 2 | 600.00 | 0.002500 | 0.925 | 4.5 |"));
        assert!(content.contains("| 2 | CONTEXT_DUMP | 1 | 3000.00 | 0.020000 | 0.800 | 3 |"));
        assert!(content.contains("| Performance improvement | 5x |"));
        assert!(content.contains("| Cost reduction | 8x |"));
        assert!(content.contains("| Quality improvement | 15.63% |"));
        assert!(content.contains("- **ROI Delivered:** 800% return on investment"));
        assert!(content.contains("1. Scale RAG implementation across all use cases"));
    }

    #[test]
    fn test_undefined_factors_render_as_na() {
        let records = vec![MetricRecord::new(ProcessingMethod::Rag, 500.0, 0.002, 0.95)];
        let report = MetricsAggregator::new().analyze(&records, ComparisonMode::default());
        let summary = ExecutiveSummary::build(&report, RoiPolicy::default(), String::new());

        let content = MarkdownReporter::new().render(&summary);

        assert!(content.contains("| Performance improvement | n/a |"));
        assert!(content.contains("### Issues"));
        assert!(content.contains("> No comparison available"));
        assert!(!content.contains("## Strategic Recommendations"));
    }
}
