//! @ai:module:intent Chart generation for per-method analysis results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, MethodBar
//! @ai:module:stateless true

use crate::metrics::AnalysisReport;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent One bar of a per-method chart
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBar {
    pub label: String,
    pub value: f64,
}

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from a report
    fn generate_all(&self, report: &AnalysisReport, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates bar charts of per-method means
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Mean response time per method, in ranking order
    /// @ai:effects pure
    pub fn response_time_bars(report: &AnalysisReport) -> Vec<MethodBar> {
        report
            .rankings
            .iter()
            .map(|r| MethodBar {
                label: r.method.to_string(),
                value: r.mean_response_time_ms,
            })
            .collect()
    }

    /// @ai:intent Mean cost per method, in ranking order
    /// @ai:effects pure
    pub fn cost_bars(report: &AnalysisReport) -> Vec<MethodBar> {
        report
            .rankings
            .iter()
            .map(|r| MethodBar {
                label: r.method.to_string(),
                value: r.mean_cost_usd,
            })
            .collect()
    }

    /// @ai:intent Upper bound of the value axis with 10% headroom
    /// @ai:effects pure
    pub fn axis_max(bars: &[MethodBar]) -> f64 {
        let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);

        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// @ai:intent Draw a single-series bar chart
    /// @ai:effects fs:write
    fn generate_bar_chart(
        &self,
        bars: &[MethodBar],
        caption: &str,
        y_desc: &str,
        color: &RGBColor,
        output_path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0..bars.len() as i32, 0f64..Self::axis_max(bars))?;

        chart
            .configure_mesh()
            .x_labels(bars.len().max(1))
            .y_desc(y_desc)
            .x_desc("Method")
            .x_label_formatter(&|x| {
                bars.get(*x as usize)
                    .map(|b| b.label.clone())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, bar.value)],
                color.mix(0.7).filled(),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts; nothing is drawn for an empty report
    /// @ai:effects fs:write
    fn generate_all(&self, report: &AnalysisReport, output_dir: &Path) -> Result<Vec<String>> {
        if report.rankings.is_empty() {
            return Ok(vec![]);
        }

        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();

        self.generate_bar_chart(
            &Self::response_time_bars(report),
            "Mean Response Time by Method",
            "Response time (ms)",
            &BLUE,
            &output_dir.join("response_time.png"),
        )?;
        generated.push("response_time.png".to_string());

        self.generate_bar_chart(
            &Self::cost_bars(report),
            "Mean Cost by Method",
            "Cost (USD)",
            &GREEN,
            &output_dir.join("cost.png"),
        )?;
        generated.push("cost.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        ComparisonMode, MetricRecord, MetricsAggregator, MetricsAggregatorTrait, ProcessingMethod,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_report() -> AnalysisReport {
        let records = vec![
            MetricRecord::new(ProcessingMethod::ContextDump, 3000.0, 0.02, 0.80),
            MetricRecord::new(ProcessingMethod::Hybrid, 1200.0, 0.008, 0.88),
            MetricRecord::new(ProcessingMethod::Rag, 600.0, 0.0025, 0.92),
        ];
        MetricsAggregator::new().analyze(&records, ComparisonMode::Ranked)
    }

    #[test]
    fn test_bars_follow_ranking_order() {
        let report = create_test_report();

        let labels: Vec<_> = ChartGenerator::response_time_bars(&report)
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["RAG", "HYBRID", "CONTEXT_DUMP"]);

        let costs = ChartGenerator::cost_bars(&report);
        assert_eq!(costs[2].value, 0.02);
    }

    #[test]
    fn test_axis_max_has_headroom() {
        let bars = vec![MethodBar {
            label: "RAG".to_string(),
            value: 100.0,
        }];
        assert!((ChartGenerator::axis_max(&bars) - 110.0).abs() < 1e-9);
        assert_eq!(ChartGenerator::axis_max(&[]), 1.0);
    }

    #[test]
    fn test_empty_report_draws_nothing() {
        let temp = TempDir::new().unwrap();
        let report = MetricsAggregator::new().analyze(&[], ComparisonMode::Ranked);

        let files = ChartGenerator::new().generate_all(&report, temp.path()).unwrap();
        assert!(files.is_empty());
    }
}
