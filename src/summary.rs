//! @ai:module:intent Executive summary derived from an analysis report
//! @ai:module:layer application
//! @ai:module:public_api ExecutiveSummary, Achievement, RoiPolicy
//! @ai:module:stateless true

use crate::config::{RoiConfig, DEFAULT_ROI_CAP_PERCENT, DEFAULT_ROI_MULTIPLIER};
use crate::metrics::{round_to, AnalysisReport, ComparisonReport, ProcessingMethod};
use serde::{Deserialize, Serialize};

/// @ai:intent Capped ROI heuristic: min(performance x cost x multiplier, cap)
///
/// This is a business rule carried over as-is. Neither the multiplier nor the
/// cap has a statistical basis, which is why both are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiPolicy {
    pub multiplier: f64,
    pub cap_percent: f64,
}

impl RoiPolicy {
    /// @ai:intent ROI in percent; `None` when either factor is undefined
    /// @ai:effects pure
    pub fn roi_percent(
        &self,
        performance_factor: Option<f64>,
        cost_factor: Option<f64>,
    ) -> Option<f64> {
        let raw = performance_factor? * cost_factor? * self.multiplier;
        Some(round_to(raw.min(self.cap_percent), 2))
    }
}

impl Default for RoiPolicy {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_ROI_MULTIPLIER,
            cap_percent: DEFAULT_ROI_CAP_PERCENT,
        }
    }
}

impl From<&RoiConfig> for RoiPolicy {
    fn from(config: &RoiConfig) -> Self {
        Self {
            multiplier: config.multiplier,
            cap_percent: config.cap_percent,
        }
    }
}

/// @ai:intent A single labelled headline figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub label: String,
    pub value: String,
}

impl Achievement {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// @ai:intent Executive summary with key achievements and recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub timestamp: String,
    /// Set when the summary could not be built, e.g. "No data available for analysis".
    #[serde(default)]
    pub error: Option<String>,
    pub key_achievements: Vec<Achievement>,
    pub business_impact: Vec<Achievement>,
    pub strategic_recommendations: Vec<String>,
    pub roi_percent: Option<f64>,
    pub roi_policy: RoiPolicy,
    pub raw_analysis: AnalysisReport,
}

const NOT_AVAILABLE: &str = "not available";

impl ExecutiveSummary {
    /// @ai:intent Build the summary for a report
    /// @ai:pre timestamp is an RFC 3339 string supplied by the caller
    /// @ai:effects pure
    pub fn build(report: &AnalysisReport, policy: RoiPolicy, timestamp: String) -> Self {
        let comparison = match (&report.comparison, report.has_data()) {
            (Some(c), true) => c,
            (_, has_data) => {
                let error = if has_data {
                    report
                        .issues
                        .first()
                        .map(|e| format!("No comparison available: {}", e))
                        .unwrap_or_else(|| "No comparison available".to_string())
                } else {
                    "No data available for analysis".to_string()
                };

                return Self {
                    timestamp,
                    error: Some(error),
                    key_achievements: vec![],
                    business_impact: vec![],
                    strategic_recommendations: vec![],
                    roi_percent: None,
                    roi_policy: policy,
                    raw_analysis: report.clone(),
                };
            }
        };

        let roi_percent = policy.roi_percent(
            comparison.performance_improvement_factor,
            comparison.cost_reduction_factor,
        );

        Self {
            timestamp,
            error: None,
            key_achievements: key_achievements(comparison, roi_percent),
            business_impact: business_impact(comparison),
            strategic_recommendations: recommendations(comparison),
            roi_percent,
            roi_policy: policy,
            raw_analysis: report.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }
}

/// The other method of the pair.
fn other(comparison: &ComparisonReport, method: ProcessingMethod) -> ProcessingMethod {
    if method == comparison.candidate {
        comparison.baseline
    } else {
        comparison.candidate
    }
}

fn key_achievements(comparison: &ComparisonReport, roi_percent: Option<f64>) -> Vec<Achievement> {
    let performance = match (comparison.performance_improvement_factor, comparison.faster_method) {
        (Some(f), Some(faster)) => format!(
            "{} is {}x faster than {}",
            faster,
            f,
            other(comparison, faster)
        ),
        (Some(_), None) => format!(
            "{} and {} have the same mean response time",
            comparison.candidate, comparison.baseline
        ),
        (None, _) => NOT_AVAILABLE.to_string(),
    };

    let cost = match (comparison.cost_reduction_factor, comparison.cheaper_method) {
        (Some(f), Some(cheaper)) => format!(
            "{}x cost reduction with {} over {}",
            f,
            cheaper,
            other(comparison, cheaper)
        ),
        (Some(_), None) => format!(
            "{} and {} have the same mean cost",
            comparison.candidate, comparison.baseline
        ),
        (None, _) => NOT_AVAILABLE.to_string(),
    };

    let quality = match comparison.quality_improvement_percent {
        Some(q) if q >= 0.0 => format!("{}% quality increase for {}", q, comparison.candidate),
        Some(q) => format!("{}% quality decrease for {}", q.abs(), comparison.candidate),
        None => NOT_AVAILABLE.to_string(),
    };

    let roi = roi_percent
        .map(|r| format!("{}% return on investment", r))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        Achievement::new("Performance Improvement", performance),
        Achievement::new("Cost Reduction", cost),
        Achievement::new("Quality Improvement", quality),
        Achievement::new("ROI Delivered", roi),
    ]
}

fn business_impact(comparison: &ComparisonReport) -> Vec<Achievement> {
    let labels = &comparison.labels;

    vec![
        Achievement::new("Operational Efficiency", labels.operational_efficiency.clone()),
        Achievement::new("Cost Optimization", labels.cost_optimization.clone()),
        Achievement::new("User Satisfaction", labels.user_satisfaction.clone()),
        Achievement::new("Market Position", labels.market_position.clone()),
    ]
}

/// @ai:intent Recommendations keyed on which method won each dimension
/// @ai:effects pure
fn recommendations(comparison: &ComparisonReport) -> Vec<String> {
    let candidate = comparison.candidate;
    let faster = comparison.faster_method == Some(candidate);
    let cheaper = comparison.cheaper_method == Some(candidate);
    let better_quality = comparison
        .quality_improvement_percent
        .map(|q| q >= 0.0)
        .unwrap_or(false);

    let mut recs = Vec::new();

    if faster && cheaper && better_quality {
        recs.push(format!("Scale {} implementation across all use cases", candidate));
    } else if faster && cheaper {
        recs.push(format!(
            "Adopt {} where latency and cost dominate; review answer quality before scaling",
            candidate
        ));
    } else if faster || cheaper {
        recs.push(format!(
            "Run a targeted pilot of {} on workloads matching its advantage",
            candidate
        ));
    } else {
        recs.push(format!(
            "Keep {} as the primary method until {} closes the gap",
            comparison.baseline, candidate
        ));
    }

    if candidate == ProcessingMethod::Rag && faster {
        recs.push("Invest in advanced vector optimization".to_string());
    }

    if !better_quality {
        recs.push(
            "Investigate retrieval relevance and prompt construction for quality gaps".to_string(),
        );
    }

    if comparison.labels.user_satisfaction == "Low" {
        recs.push("Collect structured user feedback to explain low satisfaction".to_string());
    }

    recs.push("Re-run this comparison after each change to the processing pipeline".to_string());
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{ComparisonMode, MetricRecord, MetricsAggregator, MetricsAggregatorTrait};
    use pretty_assertions::assert_eq;

    fn scenario_report() -> AnalysisReport {
        let records = vec![
            MetricRecord::new(ProcessingMethod::Rag, 500.0, 0.002, 0.95).with_satisfaction(5),
            MetricRecord::new(ProcessingMethod::Rag, 700.0, 0.003, 0.90).with_satisfaction(4),
            MetricRecord::new(ProcessingMethod::ContextDump, 3000.0, 0.02, 0.80)
                .with_satisfaction(3),
        ];
        MetricsAggregator::new().analyze(&records, ComparisonMode::default())
    }

    #[test]
    fn test_roi_is_capped() {
        let policy = RoiPolicy::default();
        assert_eq!(policy.roi_percent(Some(5.0), Some(8.0)), Some(800.0));
        assert_eq!(policy.roi_percent(Some(6.0), Some(8.0)), Some(900.0));
        assert_eq!(policy.roi_percent(None, Some(8.0)), None);
    }

    #[test]
    fn test_roi_policy_is_configurable() {
        let policy = RoiPolicy::from(&RoiConfig {
            multiplier: 10.0,
            cap_percent: 250.0,
        });
        assert_eq!(policy.roi_percent(Some(2.0), Some(3.0)), Some(60.0));
        assert_eq!(policy.roi_percent(Some(5.0), Some(8.0)), Some(250.0));
    }

    #[test]
    fn test_summary_uses_only_computed_numbers() {
        let summary = ExecutiveSummary::build(
            &scenario_report(),
            RoiPolicy::default(),
            "2026-01-19T00:00:00Z".to_string(),
        );

        assert!(summary.is_available());
        assert_eq!(summary.roi_percent, Some(800.0));

        let values: Vec<_> = summary.key_achievements.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "RAG is 5x faster than CONTEXT_DUMP",
                "8x cost reduction with RAG over CONTEXT_DUMP",
                "15.63% quality increase for RAG",
                "800% return on investment",
            ]
        );

        assert_eq!(summary.business_impact[0].value, "Outstanding");
        assert_eq!(summary.business_impact[2].value, "High");
        assert_eq!(
            summary.strategic_recommendations[0],
            "Scale RAG implementation across all use cases"
        );
    }

    #[test]
    fn test_summary_without_data() {
        let report = MetricsAggregator::new().analyze(&[], ComparisonMode::default());
        let summary = ExecutiveSummary::build(&report, RoiPolicy::default(), String::new());

        assert!(!summary.is_available());
        assert_eq!(summary.error.as_deref(), Some("No data available for analysis"));
        assert!(summary.key_achievements.is_empty());
        assert_eq!(summary.roi_percent, None);
    }

    #[test]
    fn test_summary_with_missing_method() {
        let records = vec![MetricRecord::new(ProcessingMethod::Rag, 500.0, 0.002, 0.95)];
        let report = MetricsAggregator::new().analyze(&records, ComparisonMode::default());
        let summary = ExecutiveSummary::build(&report, RoiPolicy::default(), String::new());

        assert_eq!(
            summary.error.as_deref(),
            Some("No comparison available: expected method CONTEXT_DUMP is absent from the data")
        );
    }

    #[test]
    fn test_slower_candidate_gets_cautious_recommendation() {
        let records = vec![
            MetricRecord::new(ProcessingMethod::Rag, 1500.0, 0.03, 0.70),
            MetricRecord::new(ProcessingMethod::ContextDump, 500.0, 0.01, 0.80),
        ];
        let report = MetricsAggregator::new().analyze(&records, ComparisonMode::default());
        let summary = ExecutiveSummary::build(&report, RoiPolicy::default(), String::new());

        assert_eq!(summary.key_achievements[0].value, "CONTEXT_DUMP is 3x faster than RAG");
        assert_eq!(
            summary.strategic_recommendations[0],
            "Keep CONTEXT_DUMP as the primary method until RAG closes the gap"
        );
        assert!(summary.key_achievements[2].value.contains("quality decrease"));
    }
}
