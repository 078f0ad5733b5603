//! @ai:module:intent Metric records, per-method aggregation and comparison
//! @ai:module:layer application
//! @ai:module:public_api MetricRecord, MethodAggregate, ComparisonReport, AnalysisReport, MetricsAggregator

pub mod aggregator;
pub mod types;

pub use aggregator::{
    cost_reduction_factor, performance_improvement_factor, quality_improvement_percent, round_to,
    MetricsAggregator, MetricsAggregatorTrait,
};
pub use types::{
    AnalysisReport, ComparisonMode, ComparisonReport, MethodAggregate, MethodRanking,
    MetricRecord, ProcessingMethod, QualitativeLabels,
};
