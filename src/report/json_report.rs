//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter
//! @ai:module:stateless true

use crate::summary::ExecutiveSummary;
use anyhow::{Context, Result};
use std::path::Path;

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Write the summary as JSON
    fn generate(&self, summary: &ExecutiveSummary, output_path: &Path) -> Result<()>;

    /// @ai:intent Read a summary previously written by `generate`
    fn load(&self, input_path: &Path) -> Result<ExecutiveSummary>;
}

/// @ai:intent Generates JSON reports from executive summaries
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, summary: &ExecutiveSummary, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }

    /// @ai:intent Load a JSON report from file
    /// @ai:effects fs:read
    fn load(&self, input_path: &Path) -> Result<ExecutiveSummary> {
        let content = std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read {}", input_path.display()))?;
        let summary = serde_json::from_str(&content)
            .with_context(|| format!("Invalid analysis file {}", input_path.display()))?;
        Ok(summary)
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

    #[test]
    fn test_generate_json_report() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("analysis.json");

        let records = vec![
            MetricRecord::new(ProcessingMethod::Rag, 500.0, 0.002, 0.95),
            MetricRecord::new(ProcessingMethod::ContextDump, 3000.0, 0.02, 0.80),
        ];
        let report = MetricsAggregator::new().analyze(&records, ComparisonMode::default());
        let summary = ExecutiveSummary::build(
            &report,
            RoiPolicy::default(),
            "2026-01-19T00:00:00Z".to_string(),
        );

        reporter.generate(&summary, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("\"performance_improvement_factor\": 6.0"));
        assert!(content.contains("\"CONTEXT_DUMP\""));

        let loaded = reporter.load(&output).unwrap();
        assert_eq!(loaded.key_achievements, summary.key_achievements);
        assert_eq!(loaded.roi_percent, Some(900.0));
    }

    #[test]
    fn test_undefined_values_are_null() {
        let reporter = JsonReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("analysis.json");

        let report = MetricsAggregator::new().analyze(&[], ComparisonMode::default());
        let summary = ExecutiveSummary::build(&report, RoiPolicy::default(), String::new());
        reporter.generate(&summary, &output).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(value["raw_analysis"]["cost_reduction_factor"].is_null());
        assert_eq!(value["raw_analysis"]["issues"][0]["kind"], "no_data");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(JsonReporter::new().load(&path).is_err());
    }
}
