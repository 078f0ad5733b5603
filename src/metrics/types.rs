//! @ai:module:intent Metric types for method comparison
//! @ai:module:layer domain
//! @ai:module:public_api ProcessingMethod, MetricRecord, MethodAggregate, MethodRanking, ComparisonReport, AnalysisReport
//! @ai:module:stateless true

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// @ai:intent AI query-processing strategy being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingMethod {
    Rag,
    ContextDump,
    Hybrid,
}

impl ProcessingMethod {
    /// @ai:intent Convert method to its stored string form
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMethod::Rag => "RAG",
            ProcessingMethod::ContextDump => "CONTEXT_DUMP",
            ProcessingMethod::Hybrid => "HYBRID",
        }
    }
}

impl std::fmt::Display for ProcessingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProcessingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RAG" => Ok(ProcessingMethod::Rag),
            "CONTEXT_DUMP" => Ok(ProcessingMethod::ContextDump),
            "HYBRID" => Ok(ProcessingMethod::Hybrid),
            other => Err(format!(
                "unknown processing method '{}' (expected RAG, CONTEXT_DUMP or HYBRID)",
                other
            )),
        }
    }
}

/// @ai:intent One recorded performance observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub method: ProcessingMethod,
    pub response_time_ms: f64,
    pub cost_usd: f64,
    /// Bounded to [0, 1].
    pub quality_score: f64,
    #[serde(default)]
    pub user_satisfaction: Option<u8>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    /// Number of observations this record stands for, e.g. the interactions
    /// behind a pre-aggregated row. `None` counts as one.
    #[serde(default)]
    pub weight: Option<u64>,
}

impl MetricRecord {
    /// @ai:intent Create a record with the required fields only
    /// @ai:effects pure
    pub fn new(
        method: ProcessingMethod,
        response_time_ms: f64,
        cost_usd: f64,
        quality_score: f64,
    ) -> Self {
        Self {
            method,
            response_time_ms,
            cost_usd,
            quality_score,
            user_satisfaction: None,
            tokens_used: None,
            weight: None,
        }
    }

    pub fn with_satisfaction(mut self, satisfaction: u8) -> Self {
        self.user_satisfaction = Some(satisfaction);
        self
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    pub fn with_weight(mut self, weight: u64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// @ai:intent Observations represented by this record
    /// @ai:post result >= 1, so weighted means stay defined
    /// @ai:effects pure
    pub fn observations(&self) -> u64 {
        self.weight.unwrap_or(1).max(1)
    }
}

/// @ai:intent Per-method summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodAggregate {
    pub method: ProcessingMethod,
    /// Observations behind the means: the sum of record weights.
    pub count: u64,
    /// Rounded to 2 decimals.
    pub mean_response_time_ms: f64,
    /// Rounded to 6 decimals.
    pub mean_cost_usd: f64,
    /// Rounded to 3 decimals.
    pub mean_quality_score: f64,
    /// Rounded to 2 decimals; absent when no record carried a satisfaction score.
    pub mean_user_satisfaction: Option<f64>,
    pub total_tokens: u64,
}

/// @ai:intent Position of a method in the response-time ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRanking {
    pub rank: u32,
    pub method: ProcessingMethod,
    pub mean_response_time_ms: f64,
    pub mean_cost_usd: f64,
    pub mean_quality_score: f64,
}

impl From<(u32, &MethodAggregate)> for MethodRanking {
    fn from((rank, aggregate): (u32, &MethodAggregate)) -> Self {
        Self {
            rank,
            method: aggregate.method,
            mean_response_time_ms: aggregate.mean_response_time_ms,
            mean_cost_usd: aggregate.mean_cost_usd,
            mean_quality_score: aggregate.mean_quality_score,
        }
    }
}

/// @ai:intent Which pair of aggregates a report compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Compare two named methods.
    Pairwise {
        baseline: ProcessingMethod,
        candidate: ProcessingMethod,
    },
    /// Compare the fastest method (candidate) with the slowest (baseline).
    Ranked,
}

impl Default for ComparisonMode {
    fn default() -> Self {
        ComparisonMode::Pairwise {
            baseline: ProcessingMethod::ContextDump,
            candidate: ProcessingMethod::Rag,
        }
    }
}

/// @ai:intent Qualitative labels derived from the computed factors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitativeLabels {
    pub operational_efficiency: String,
    pub cost_optimization: String,
    pub user_satisfaction: String,
    pub market_position: String,
}

/// @ai:intent Derived comparison between a baseline and a candidate aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub baseline: ProcessingMethod,
    pub candidate: ProcessingMethod,
    /// slower / faster mean response time; `None` when undefined.
    pub performance_improvement_factor: Option<f64>,
    /// higher / lower mean cost; `None` when undefined.
    pub cost_reduction_factor: Option<f64>,
    /// (candidate - baseline) / baseline quality x 100; `None` when undefined.
    pub quality_improvement_percent: Option<f64>,
    /// `None` when both methods are equally fast or the ratio is undefined.
    pub faster_method: Option<ProcessingMethod>,
    pub cheaper_method: Option<ProcessingMethod>,
    pub labels: QualitativeLabels,
    #[serde(default)]
    pub issues: Vec<AnalysisError>,
}

/// @ai:intent Complete analysis output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mode: ComparisonMode,
    /// Input rows.
    pub record_count: usize,
    /// Observations the rows stand for; equals `record_count` for unweighted rows.
    #[serde(default)]
    pub observation_count: u64,
    pub method_aggregates: BTreeMap<String, MethodAggregate>,
    /// Ascending by mean response time; rank 1 is the fastest.
    pub rankings: Vec<MethodRanking>,
    pub best_performer: Option<MethodRanking>,
    pub worst_performer: Option<MethodRanking>,
    pub comparison: Option<ComparisonReport>,
    pub performance_improvement_factor: Option<f64>,
    pub cost_reduction_factor: Option<f64>,
    pub quality_improvement_percent: Option<f64>,
    #[serde(default)]
    pub issues: Vec<AnalysisError>,
}

impl AnalysisReport {
    /// @ai:intent Sentinel report for an empty input
    /// @ai:effects pure
    pub fn no_data(mode: ComparisonMode) -> Self {
        Self {
            mode,
            record_count: 0,
            observation_count: 0,
            method_aggregates: BTreeMap::new(),
            rankings: vec![],
            best_performer: None,
            worst_performer: None,
            comparison: None,
            performance_improvement_factor: None,
            cost_reduction_factor: None,
            quality_improvement_percent: None,
            issues: vec![AnalysisError::NoData],
        }
    }

    /// @ai:intent Whether the report was built from at least one record
    /// @ai:effects pure
    pub fn has_data(&self) -> bool {
        !self.issues.contains(&AnalysisError::NoData)
    }

    /// @ai:intent Look up the aggregate for a method
    /// @ai:effects pure
    pub fn aggregate(&self, method: ProcessingMethod) -> Option<&MethodAggregate> {
        self.method_aggregates.get(method.as_str())
    }
}
