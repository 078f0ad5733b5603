//! @ai:module:intent Orchestrates scripts, data fetching, analysis and summaries
//! @ai:module:layer application
//! @ai:module:public_api BrainProcessor, DataSource
//! @ai:module:stateless false

use crate::config::AnalyticsConfig;
use crate::metrics::{
    AnalysisReport, ComparisonMode, MetricRecord, MetricsAggregator, MetricsAggregatorTrait,
};
use crate::store::{
    records_from_rows, MetricsStore, QueryResult, ScriptKind, ScriptOutcome, ScriptRunner,
    TableViewQuery,
};
use crate::summary::{ExecutiveSummary, RoiPolicy};
use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// @ai:intent Which query supplies the metric rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataSource {
    /// One row per recorded query, joined with its quality metrics.
    #[default]
    Metrics,
    /// One pre-aggregated row per method and model.
    Analytics,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Metrics => "metrics",
            DataSource::Analytics => "analytics",
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metrics" => Ok(DataSource::Metrics),
            "analytics" => Ok(DataSource::Analytics),
            other => Err(format!("unknown data source '{}'", other)),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Wires a metrics store to the aggregator and summary builder
pub struct BrainProcessor<S: MetricsStore> {
    store: Arc<S>,
    config: AnalyticsConfig,
    aggregator: MetricsAggregator,
    scripts: ScriptRunner,
    view_query: TableViewQuery,
}

impl<S: MetricsStore> BrainProcessor<S> {
    /// @ai:intent Create a processor over a store
    /// @ai:effects pure
    pub fn new(store: Arc<S>, config: AnalyticsConfig) -> Self {
        let scripts = ScriptRunner::new(&config.scripts);

        Self {
            store,
            config,
            aggregator: MetricsAggregator::new(),
            scripts,
            view_query: TableViewQuery::new(),
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// @ai:intent Execute schema scripts (CREATE TABLE ...)
    /// @ai:effects fs:read, db:write
    pub async fn run_ddl(&self, file: Option<&Path>) -> Result<ScriptOutcome> {
        self.scripts
            .run(self.store.as_ref(), ScriptKind::Ddl, file)
            .await
            .context("DDL execution failed")
    }

    /// @ai:intent Execute data scripts (INSERT ...)
    /// @ai:effects fs:read, db:write
    pub async fn run_dml(&self, file: Option<&Path>) -> Result<ScriptOutcome> {
        self.scripts
            .run(self.store.as_ref(), ScriptKind::Dml, file)
            .await
            .context("DML execution failed")
    }

    /// @ai:intent Fetch the newest rows of a table
    /// @ai:effects db:read
    pub async fn view_table(
        &self,
        table: &str,
        limit: u32,
        order_by: Option<&str>,
    ) -> Result<QueryResult> {
        let sql = self.view_query.build(table, order_by)?;

        tracing::info!("Viewing table: {} (limit: {})", table, limit);
        let result = self
            .store
            .query(&sql, vec![json!(limit)])
            .await
            .with_context(|| format!("Failed to view table {}", table))?;

        if result.is_empty() {
            tracing::warn!("No data found in {}", table);
        } else {
            tracing::info!("Retrieved {} rows from {}", result.len(), table);
        }

        Ok(result)
    }

    /// @ai:intent Fetch and validate the rows of a data source
    /// @ai:post every returned record passed boundary validation
    /// @ai:effects db:read
    pub async fn fetch_records(&self, source: DataSource) -> Result<Vec<MetricRecord>> {
        let sql = match source {
            DataSource::Metrics => &self.config.analysis.metrics_query,
            DataSource::Analytics => &self.config.analysis.analytics_query,
        };

        let result = self
            .store
            .query(sql, vec![])
            .await
            .with_context(|| format!("Failed to fetch {} rows", source))?;

        let records = records_from_rows(&result.to_rows())
            .with_context(|| format!("Invalid row in {} data", source))?;

        tracing::debug!("Fetched {} {} records", records.len(), source);
        Ok(records)
    }

    /// @ai:intent Analyze a complete snapshot of one data source
    /// @ai:effects db:read
    pub async fn analyze(
        &self,
        source: DataSource,
        mode: ComparisonMode,
    ) -> Result<AnalysisReport> {
        let records = self.fetch_records(source).await?;
        let report = self.aggregator.analyze(&records, mode);

        for issue in &report.issues {
            if issue.is_recoverable() {
                tracing::warn!("Analysis issue ({}): {}", source, issue);
            } else {
                tracing::error!("Analysis error ({}): {}", source, issue);
            }
        }

        tracing::info!(
            "Performance analysis completed: {} records, {} methods",
            report.record_count,
            report.method_aggregates.len()
        );
        Ok(report)
    }

    /// @ai:intent Analyze and wrap the result in an executive summary
    /// @ai:effects db:read, time
    pub async fn executive_summary(
        &self,
        source: DataSource,
        mode: ComparisonMode,
    ) -> Result<ExecutiveSummary> {
        let report = self.analyze(source, mode).await?;

        Ok(ExecutiveSummary::build(
            &report,
            RoiPolicy::from(&self.config.roi),
            chrono::Utc::now().to_rfc3339(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScriptConfig;
    use crate::metrics::ProcessingMethod;
    use crate::store::SqliteStore;
    use std::path::PathBuf;

    fn shipped_scripts_config() -> AnalyticsConfig {
        AnalyticsConfig {
            scripts: ScriptConfig {
                base_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("sql"),
                ddl: vec![],
                dml: vec![],
            },
            ..Default::default()
        }
    }

    async fn seeded_processor() -> BrainProcessor<SqliteStore> {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let processor = BrainProcessor::new(store, shipped_scripts_config());

        processor.run_ddl(None).await.unwrap();
        processor.run_dml(None).await.unwrap();
        processor
    }

    #[tokio::test]
    async fn test_shipped_scripts_load() {
        let processor = seeded_processor().await;

        let queries = processor
            .view_table("brain_queries", 5, Some("created_at"))
            .await
            .unwrap();
        assert_eq!(queries.len(), 5);
        assert!(queries.columns.contains(&"processing_method".to_string()));

        let analytics = processor.view_table("brain_analytics", 50, None).await.unwrap();
        assert!(!analytics.is_empty());
    }

    #[tokio::test]
    async fn test_pairwise_analysis_over_shipped_data() {
        let processor = seeded_processor().await;
        let report = processor
            .analyze(DataSource::Metrics, ComparisonMode::default())
            .await
            .unwrap();

        assert!(report.has_data());
        assert!(report.issues.is_empty(), "issues: {:?}", report.issues);
        assert!(report.performance_improvement_factor.unwrap() >= 1.0);
        assert_eq!(
            report.best_performer.as_ref().unwrap().method,
            ProcessingMethod::Rag
        );
    }

    #[tokio::test]
    async fn test_ranked_summary_over_analytics_table() {
        let processor = seeded_processor().await;
        let summary = processor
            .executive_summary(DataSource::Analytics, ComparisonMode::Ranked)
            .await
            .unwrap();

        assert!(summary.is_available());
        assert_eq!(summary.raw_analysis.rankings.len(), 3);
        assert!(summary.roi_percent.unwrap() <= 900.0);
    }

    #[tokio::test]
    async fn test_analytics_rows_are_weighted_by_interactions() {
        let processor = seeded_processor().await;
        let report = processor
            .analyze(DataSource::Analytics, ComparisonMode::Ranked)
            .await
            .unwrap();

        let rag = report.aggregate(ProcessingMethod::Rag).unwrap();
        assert_eq!(rag.count, 1250 + 1180);
        assert!((rag.mean_response_time_ms - 584.86).abs() < 1e-9);

        assert_eq!(report.record_count, 6);
        assert_eq!(report.observation_count, 5600);
    }

    #[tokio::test]
    async fn test_scripts_can_be_rerun_on_the_same_database() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("brain.db");

        for _ in 0..2 {
            let store = Arc::new(SqliteStore::open_path(&path).unwrap());
            let processor = BrainProcessor::new(store, shipped_scripts_config());

            let ddl = processor.run_ddl(None).await.unwrap();
            assert_eq!(ddl.executed.len(), 2);
            let dml = processor.run_dml(None).await.unwrap();
            assert_eq!(dml.executed.len(), 2);
        }

        let store = Arc::new(SqliteStore::open_path(&path).unwrap());
        let processor = BrainProcessor::new(store, shipped_scripts_config());

        let queries = processor.view_table("brain_queries", 100, None).await.unwrap();
        assert_eq!(queries.len(), 10);
        let analytics = processor.view_table("brain_analytics", 100, None).await.unwrap();
        assert_eq!(analytics.len(), 6);
        assert_eq!(processor.fetch_records(DataSource::Metrics).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_empty_tables_report_no_data() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let processor = BrainProcessor::new(store, shipped_scripts_config());
        processor.run_ddl(None).await.unwrap();

        let summary = processor
            .executive_summary(DataSource::Metrics, ComparisonMode::default())
            .await
            .unwrap();

        assert!(!summary.raw_analysis.has_data());
        assert_eq!(summary.error.as_deref(), Some("No data available for analysis"));
    }

    #[tokio::test]
    async fn test_malformed_row_is_surfaced() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        store
            .execute_script(
                "CREATE TABLE observations (processing_method TEXT, response_time_ms INTEGER, cost_usd REAL);
                 INSERT INTO observations VALUES ('RAG', 400, 0.002);",
            )
            .await
            .unwrap();

        let mut config = AnalyticsConfig::default();
        config.analysis.metrics_query =
            "SELECT processing_method, response_time_ms, cost_usd FROM observations".to_string();

        let processor = BrainProcessor::new(store, config);
        let err = processor
            .analyze(DataSource::Metrics, ComparisonMode::default())
            .await
            .unwrap_err();

        let root = err.root_cause().to_string();
        assert!(root.contains("quality_score"), "unexpected error: {}", root);
    }

    #[test]
    fn test_data_source_parses() {
        assert_eq!("Analytics".parse::<DataSource>(), Ok(DataSource::Analytics));
        assert!("warehouse".parse::<DataSource>().is_err());
    }
}
