//! @ai:module:intent Grouping, averaging and comparison of metric records
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait
//! @ai:module:stateless true

use crate::error::AnalysisError;
use crate::metrics::types::{
    AnalysisReport, ComparisonMode, ComparisonReport, MethodAggregate, MethodRanking,
    MetricRecord, ProcessingMethod, QualitativeLabels,
};

const TIME_DECIMALS: i32 = 2;
const COST_DECIMALS: i32 = 6;
const QUALITY_DECIMALS: i32 = 3;
const SATISFACTION_DECIMALS: i32 = 2;
const FACTOR_DECIMALS: i32 = 1;
const PERCENT_DECIMALS: i32 = 2;

const UNDETERMINED: &str = "Undetermined";

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Group records by method and compute rounded means
    fn aggregate(&self, records: &[MetricRecord]) -> Result<Vec<MethodAggregate>, AnalysisError>;

    /// @ai:intent Rank aggregates ascending by mean response time
    fn rank(&self, aggregates: &[MethodAggregate]) -> Vec<MethodRanking>;

    /// @ai:intent Derive improvement factors between two aggregates
    fn compare(&self, baseline: &MethodAggregate, candidate: &MethodAggregate) -> ComparisonReport;

    /// @ai:intent Build the full report for a snapshot of records
    fn analyze(&self, records: &[MetricRecord], mode: ComparisonMode) -> AnalysisReport;
}

/// @ai:intent Aggregates metric records into per-method comparisons
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Pick the two aggregates a mode compares
    /// @ai:effects pure
    fn select_pair<'a>(
        aggregates: &'a [MethodAggregate],
        rankings: &[MethodRanking],
        mode: ComparisonMode,
    ) -> Result<(&'a MethodAggregate, &'a MethodAggregate), AnalysisError> {
        let find = |method: ProcessingMethod| {
            aggregates
                .iter()
                .find(|a| a.method == method)
                .ok_or_else(|| AnalysisError::MissingMethod {
                    method: method.as_str().to_string(),
                })
        };

        match mode {
            ComparisonMode::Pairwise {
                baseline,
                candidate,
            } => Ok((find(baseline)?, find(candidate)?)),
            ComparisonMode::Ranked => match (rankings.first(), rankings.last()) {
                (Some(best), Some(worst)) if rankings.len() >= 2 => {
                    Ok((find(worst.method)?, find(best.method)?))
                }
                _ => Err(AnalysisError::InsufficientMethods {
                    found: rankings.len(),
                }),
            },
        }
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Running weighted sums for one method group.
#[derive(Default)]
struct Accumulator {
    count: u64,
    response_time_sum: f64,
    cost_sum: f64,
    quality_sum: f64,
    satisfaction_sum: f64,
    satisfaction_count: u64,
    tokens: u64,
}

impl Accumulator {
    fn push(&mut self, record: &MetricRecord) {
        let observations = record.observations();
        let weight = observations as f64;

        self.count += observations;
        self.response_time_sum += record.response_time_ms * weight;
        self.cost_sum += record.cost_usd * weight;
        self.quality_sum += record.quality_score * weight;

        if let Some(satisfaction) = record.user_satisfaction {
            self.satisfaction_sum += satisfaction as f64 * weight;
            self.satisfaction_count += observations;
        }

        self.tokens += record.tokens_used.unwrap_or(0);
    }

    fn finish(&self, method: ProcessingMethod) -> MethodAggregate {
        let n = self.count as f64;

        let mean_user_satisfaction = if self.satisfaction_count == 0 {
            None
        } else {
            Some(round_to(
                self.satisfaction_sum / self.satisfaction_count as f64,
                SATISFACTION_DECIMALS,
            ))
        };

        MethodAggregate {
            method,
            count: self.count,
            mean_response_time_ms: round_to(self.response_time_sum / n, TIME_DECIMALS),
            mean_cost_usd: round_to(self.cost_sum / n, COST_DECIMALS),
            mean_quality_score: round_to(self.quality_sum / n, QUALITY_DECIMALS),
            mean_user_satisfaction,
            total_tokens: self.tokens,
        }
    }
}

/// @ai:intent Round to a fixed number of decimal places, half away from zero
/// @ai:effects pure
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// @ai:intent Ratio of the larger value to the smaller, rounded to one decimal
/// @ai:effects pure
fn ratio_of_extremes(
    a: f64,
    b: f64,
    factor: &str,
    denominator: &str,
) -> Result<f64, AnalysisError> {
    let (high, low) = if a >= b { (a, b) } else { (b, a) };

    if low <= 0.0 {
        return Err(AnalysisError::undefined_ratio(factor, denominator));
    }

    Ok(round_to(high / low, FACTOR_DECIMALS))
}

/// @ai:intent slower / faster mean response time
/// @ai:post result >= 1.0 when Ok
/// @ai:effects pure
pub fn performance_improvement_factor(
    baseline_time_ms: f64,
    candidate_time_ms: f64,
) -> Result<f64, AnalysisError> {
    ratio_of_extremes(
        baseline_time_ms,
        candidate_time_ms,
        "performance_improvement_factor",
        "faster mean response time",
    )
}

/// @ai:intent higher / lower mean cost
/// @ai:post result >= 1.0 when Ok
/// @ai:effects pure
pub fn cost_reduction_factor(
    baseline_cost: f64,
    candidate_cost: f64,
) -> Result<f64, AnalysisError> {
    ratio_of_extremes(
        baseline_cost,
        candidate_cost,
        "cost_reduction_factor",
        "lower mean cost",
    )
}

/// @ai:intent Relative quality change of the candidate over the baseline, in percent
/// @ai:effects pure
pub fn quality_improvement_percent(
    baseline_quality: f64,
    candidate_quality: f64,
) -> Result<f64, AnalysisError> {
    if baseline_quality == 0.0 {
        return Err(AnalysisError::undefined_ratio(
            "quality_improvement_percent",
            "baseline mean quality",
        ));
    }

    Ok(round_to(
        (candidate_quality - baseline_quality) / baseline_quality * 100.0,
        PERCENT_DECIMALS,
    ))
}

/// The method with the strictly lower value, if any.
fn lower_of(
    baseline: (ProcessingMethod, f64),
    candidate: (ProcessingMethod, f64),
) -> Option<ProcessingMethod> {
    if candidate.1 < baseline.1 {
        Some(candidate.0)
    } else if baseline.1 < candidate.1 {
        Some(baseline.0)
    } else {
        None
    }
}

fn efficiency_label(factor: f64) -> &'static str {
    if factor >= 5.0 {
        "Outstanding"
    } else if factor >= 2.0 {
        "Strong"
    } else if factor >= 1.2 {
        "Moderate"
    } else {
        "Marginal"
    }
}

fn cost_label(factor: f64) -> &'static str {
    if factor >= 5.0 {
        "Exceptional"
    } else if factor >= 2.0 {
        "Significant"
    } else if factor >= 1.2 {
        "Moderate"
    } else {
        "Marginal"
    }
}

fn satisfaction_label(mean: Option<f64>) -> &'static str {
    match mean {
        Some(s) if s >= 4.0 => "High",
        Some(s) if s >= 3.0 => "Moderate",
        Some(_) => "Low",
        None => UNDETERMINED,
    }
}

fn market_label(quality_percent: Option<f64>) -> &'static str {
    match quality_percent {
        Some(q) if q >= 10.0 => "Leading",
        Some(q) if q >= 0.0 => "Competitive",
        Some(_) => "Lagging",
        None => UNDETERMINED,
    }
}

/// @ai:intent Derive qualitative labels from the candidate's point of view
/// @ai:effects pure
fn derive_labels(
    candidate: &MethodAggregate,
    performance: Option<f64>,
    cost: Option<f64>,
    quality: Option<f64>,
    faster: Option<ProcessingMethod>,
    cheaper: Option<ProcessingMethod>,
) -> QualitativeLabels {
    // A factor only speaks for the candidate when the candidate is the winner.
    let efficiency = match (performance, faster) {
        (None, _) => UNDETERMINED,
        (Some(f), Some(m)) if m == candidate.method => efficiency_label(f),
        _ => "Marginal",
    };
    let cost_optimization = match (cost, cheaper) {
        (None, _) => UNDETERMINED,
        (Some(f), Some(m)) if m == candidate.method => cost_label(f),
        _ => "Marginal",
    };

    QualitativeLabels {
        operational_efficiency: efficiency.to_string(),
        cost_optimization: cost_optimization.to_string(),
        user_satisfaction: satisfaction_label(candidate.mean_user_satisfaction).to_string(),
        market_position: market_label(quality).to_string(),
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Group records by method in order of first appearance
    /// @ai:effects pure
    fn aggregate(&self, records: &[MetricRecord]) -> Result<Vec<MethodAggregate>, AnalysisError> {
        if records.is_empty() {
            return Err(AnalysisError::NoData);
        }

        let mut groups: Vec<(ProcessingMethod, Accumulator)> = Vec::new();

        for record in records {
            match groups.iter_mut().find(|(method, _)| *method == record.method) {
                Some((_, acc)) => acc.push(record),
                None => {
                    let mut acc = Accumulator::default();
                    acc.push(record);
                    groups.push((record.method, acc));
                }
            }
        }

        Ok(groups
            .iter()
            .map(|(method, acc)| acc.finish(*method))
            .collect())
    }

    /// @ai:intent Rank aggregates by mean response time, ties kept in input order
    /// @ai:effects pure
    fn rank(&self, aggregates: &[MethodAggregate]) -> Vec<MethodRanking> {
        let mut ordered: Vec<&MethodAggregate> = aggregates.iter().collect();
        // sort_by is stable, so equal times keep first-seen order
        ordered.sort_by(|a, b| a.mean_response_time_ms.total_cmp(&b.mean_response_time_ms));

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, aggregate)| MethodRanking::from((i as u32 + 1, aggregate)))
            .collect()
    }

    /// @ai:intent Compute improvement factors of candidate over baseline
    /// @ai:effects pure
    fn compare(&self, baseline: &MethodAggregate, candidate: &MethodAggregate) -> ComparisonReport {
        let mut issues = Vec::new();

        let performance = performance_improvement_factor(
            baseline.mean_response_time_ms,
            candidate.mean_response_time_ms,
        )
        .map_err(|e| issues.push(e))
        .ok();

        let cost = cost_reduction_factor(baseline.mean_cost_usd, candidate.mean_cost_usd)
            .map_err(|e| issues.push(e))
            .ok();

        let quality =
            quality_improvement_percent(baseline.mean_quality_score, candidate.mean_quality_score)
                .map_err(|e| issues.push(e))
                .ok();

        let faster = performance.and_then(|_| {
            lower_of(
                (baseline.method, baseline.mean_response_time_ms),
                (candidate.method, candidate.mean_response_time_ms),
            )
        });
        let cheaper = cost.and_then(|_| {
            lower_of(
                (baseline.method, baseline.mean_cost_usd),
                (candidate.method, candidate.mean_cost_usd),
            )
        });

        let labels = derive_labels(candidate, performance, cost, quality, faster, cheaper);

        ComparisonReport {
            baseline: baseline.method,
            candidate: candidate.method,
            performance_improvement_factor: performance,
            cost_reduction_factor: cost,
            quality_improvement_percent: quality,
            faster_method: faster,
            cheaper_method: cheaper,
            labels,
            issues,
        }
    }

    /// @ai:intent Aggregate, rank and compare a snapshot of records
    /// @ai:effects pure
    fn analyze(&self, records: &[MetricRecord], mode: ComparisonMode) -> AnalysisReport {
        let aggregates = match self.aggregate(records) {
            Ok(aggregates) => aggregates,
            Err(_) => return AnalysisReport::no_data(mode),
        };

        let rankings = self.rank(&aggregates);
        let mut issues = Vec::new();

        let comparison = match Self::select_pair(&aggregates, &rankings, mode) {
            Ok((baseline, candidate)) => Some(self.compare(baseline, candidate)),
            Err(e) => {
                issues.push(e);
                None
            }
        };

        if let Some(ref c) = comparison {
            issues.extend(c.issues.iter().cloned());
        }

        AnalysisReport {
            mode,
            record_count: records.len(),
            observation_count: aggregates.iter().map(|a| a.count).sum(),
            method_aggregates: aggregates
                .iter()
                .map(|a| (a.method.as_str().to_string(), a.clone()))
                .collect(),
            best_performer: rankings.first().cloned(),
            worst_performer: rankings.last().cloned(),
            rankings,
            performance_improvement_factor: comparison
                .as_ref()
                .and_then(|c| c.performance_improvement_factor),
            cost_reduction_factor: comparison.as_ref().and_then(|c| c.cost_reduction_factor),
            quality_improvement_percent: comparison
                .as_ref()
                .and_then(|c| c.quality_improvement_percent),
            comparison,
            issues,
        }
    }
}
