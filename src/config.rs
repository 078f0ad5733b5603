//! @ai:module:intent Configuration structs for the analytics system
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalyticsConfig, DatabaseConfig, ScriptConfig, AnalysisConfig, RoiConfig, ViewConfig, PathConfig
//! @ai:module:stateless true

use crate::metrics::{ComparisonMode, ProcessingMethod};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `database.path`.
pub const DATABASE_ENV: &str = "BRAIN_DATABASE";

/// Default file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "brain.toml";

/// Multiplier of the ROI heuristic. An arbitrary business rule, not a statistical bound.
pub const DEFAULT_ROI_MULTIPLIER: f64 = 20.0;

/// Ceiling of the ROI heuristic, in percent.
pub const DEFAULT_ROI_CAP_PERCENT: f64 = 900.0;

/// Per-query observations joined with their quality metrics.
pub const DEFAULT_METRICS_QUERY: &str = "\
SELECT q.processing_method, q.response_time_ms, q.cost_usd, \
m.quality_score, m.user_satisfaction, q.tokens_used \
FROM brain_queries q \
LEFT JOIN brain_performance_metrics m ON q.query_id = m.query_id \
ORDER BY q.query_id";

/// Pre-aggregated per-method/model rows.
pub const DEFAULT_ANALYTICS_QUERY: &str = "\
SELECT context_method, model_name, avg_response_time_ms, avg_cost_usd, \
avg_quality_score, total_interactions \
FROM brain_analytics \
ORDER BY performance_rank ASC, context_method ASC";

/// @ai:intent Main configuration for the analytics system
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scripts: ScriptConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub roi: RoiConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Database location and connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

/// @ai:intent Locations of the DDL and DML scripts
///
/// Paths are relative to `base_dir`. An empty list means every `*.sql` file
/// under `base_dir/ddl` (or `base_dir/dml`) in name order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(default = "default_scripts_dir")]
    pub base_dir: PathBuf,
    #[serde(default)]
    pub ddl: Vec<PathBuf>,
    #[serde(default)]
    pub dml: Vec<PathBuf>,
}

/// @ai:intent Kind of comparison to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonKind {
    #[default]
    Pairwise,
    Ranked,
}

impl std::str::FromStr for ComparisonKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pairwise" => Ok(ComparisonKind::Pairwise),
            "ranked" => Ok(ComparisonKind::Ranked),
            other => Err(format!("unknown comparison mode '{}'", other)),
        }
    }
}

/// @ai:intent Analysis settings: comparison mode and source queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub mode: ComparisonKind,
    #[serde(default = "default_baseline")]
    pub baseline_method: ProcessingMethod,
    #[serde(default = "default_candidate")]
    pub candidate_method: ProcessingMethod,
    #[serde(default = "default_metrics_query")]
    pub metrics_query: String,
    #[serde(default = "default_analytics_query")]
    pub analytics_query: String,
}

/// @ai:intent Parameters of the capped ROI heuristic
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoiConfig {
    #[serde(default = "default_roi_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_roi_cap")]
    pub cap_percent: f64,
}

/// @ai:intent Table viewing defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_view_tables")]
    pub tables: Vec<String>,
    #[serde(default = "default_view_limit")]
    pub limit: u32,
    #[serde(default = "default_order_by")]
    pub order_by: Option<String>,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    #[serde(default = "default_max_cols")]
    pub max_cols: usize,
}

/// @ai:intent Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            base_dir: default_scripts_dir(),
            ddl: vec![],
            dml: vec![],
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: ComparisonKind::default(),
            baseline_method: default_baseline(),
            candidate_method: default_candidate(),
            metrics_query: default_metrics_query(),
            analytics_query: default_analytics_query(),
        }
    }
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            multiplier: default_roi_multiplier(),
            cap_percent: default_roi_cap(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tables: default_view_tables(),
            limit: default_view_limit(),
            order_by: default_order_by(),
            max_rows: default_max_rows(),
            max_cols: default_max_cols(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("brain.db")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("sql")
}

fn default_baseline() -> ProcessingMethod {
    ProcessingMethod::ContextDump
}

fn default_candidate() -> ProcessingMethod {
    ProcessingMethod::Rag
}

fn default_metrics_query() -> String {
    DEFAULT_METRICS_QUERY.to_string()
}

fn default_analytics_query() -> String {
    DEFAULT_ANALYTICS_QUERY.to_string()
}

fn default_roi_multiplier() -> f64 {
    DEFAULT_ROI_MULTIPLIER
}

fn default_roi_cap() -> f64 {
    DEFAULT_ROI_CAP_PERCENT
}

fn default_view_tables() -> Vec<String> {
    vec!["brain_queries".to_string(), "brain_analytics".to_string()]
}

fn default_view_limit() -> u32 {
    5
}

fn default_order_by() -> Option<String> {
    Some("created_at".to_string())
}

fn default_max_rows() -> usize {
    10
}

fn default_max_cols() -> usize {
    8
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl AnalyticsConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Resolve configuration: explicit path, then brain.toml, then defaults
    /// @ai:effects fs:read, env
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);

                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(std::env::var(DATABASE_ENV).ok());
        Ok(config)
    }

    /// @ai:intent Apply the database path override taken from the environment
    /// @ai:effects state:write
    pub fn apply_env_overrides(&mut self, database: Option<String>) {
        if let Some(path) = database.filter(|p| !p.trim().is_empty()) {
            self.database.path = PathBuf::from(path);
        }
    }
}

impl AnalysisConfig {
    /// @ai:intent Build the comparison mode these settings describe
    /// @ai:effects pure
    pub fn comparison_mode(&self) -> ComparisonMode {
        match self.mode {
            ComparisonKind::Pairwise => ComparisonMode::Pairwise {
                baseline: self.baseline_method,
                candidate: self.candidate_method,
            },
            ComparisonKind::Ranked => ComparisonMode::Ranked,
        }
    }
}
