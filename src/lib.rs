//! @ai:module:intent Comparative analytics over RAG, context-dump and hybrid query metrics
//! @ai:module:layer application
//! @ai:module:public_api config, error, metrics, processor, report, store, summary

pub mod config;
pub mod error;
pub mod metrics;
pub mod processor;
pub mod report;
pub mod store;
pub mod summary;

pub use config::AnalyticsConfig;
pub use error::{AnalysisError, StoreError};
pub use metrics::{
    AnalysisReport, ComparisonMode, MetricRecord, MetricsAggregator, MetricsAggregatorTrait,
    ProcessingMethod,
};
pub use processor::{BrainProcessor, DataSource};
pub use report::{ReportGenerator, TableRenderer};
pub use store::{MetricsStore, QueryResult, SqliteStore};
pub use summary::{ExecutiveSummary, RoiPolicy};
