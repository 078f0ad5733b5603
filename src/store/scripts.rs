//! @ai:module:intent Load and execute DDL/DML script files
//! @ai:module:layer infrastructure
//! @ai:module:public_api ScriptRunner, ScriptKind, ScriptOutcome
//! @ai:module:stateless true

use crate::config::ScriptConfig;
use crate::error::StoreError;
use crate::store::MetricsStore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Kind of script batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// Schema creation (CREATE TABLE ...)
    Ddl,
    /// Data loading (INSERT ...)
    Dml,
}

impl ScriptKind {
    /// @ai:intent Subdirectory searched when no files are configured
    /// @ai:effects pure
    pub fn dir_name(&self) -> &'static str {
        match self {
            ScriptKind::Ddl => "ddl",
            ScriptKind::Dml => "dml",
        }
    }
}

impl std::fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name().to_uppercase())
    }
}

/// @ai:intent Which files ran and which were skipped
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptOutcome {
    pub executed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// @ai:intent Resolves script files and runs them against a store
pub struct ScriptRunner {
    base_dir: PathBuf,
    ddl: Vec<PathBuf>,
    dml: Vec<PathBuf>,
}

impl ScriptRunner {
    /// @ai:intent Create a runner from script configuration
    /// @ai:effects pure
    pub fn new(config: &ScriptConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            ddl: config.ddl.clone(),
            dml: config.dml.clone(),
        }
    }

    /// @ai:intent Find all SQL files under a directory, sorted by path
    /// @ai:effects fs:read
    fn find_sql_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "sql")
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// @ai:intent List the files a batch would run
    /// @ai:effects fs:read
    pub fn resolve(&self, kind: ScriptKind, explicit: Option<&Path>) -> Vec<PathBuf> {
        if let Some(file) = explicit {
            return vec![self.base_dir.join(file)];
        }

        let configured = match kind {
            ScriptKind::Ddl => &self.ddl,
            ScriptKind::Dml => &self.dml,
        };

        if configured.is_empty() {
            Self::find_sql_files(&self.base_dir.join(kind.dir_name()))
        } else {
            configured.iter().map(|f| self.base_dir.join(f)).collect()
        }
    }

    /// @ai:intent Execute a batch of script files in order; missing files are skipped
    /// @ai:effects fs:read, db:write
    pub async fn run<S: MetricsStore>(
        &self,
        store: &S,
        kind: ScriptKind,
        explicit: Option<&Path>,
    ) -> Result<ScriptOutcome, StoreError> {
        let mut outcome = ScriptOutcome::default();

        for path in self.resolve(kind, explicit) {
            if !path.exists() {
                tracing::warn!("{} file not found: {}", kind, path.display());
                outcome.skipped.push(path);
                continue;
            }

            tracing::info!("Executing {}: {}", kind, path.display());
            let sql = std::fs::read_to_string(&path)?;

            store.execute_script(&sql).await.map_err(|e| match e {
                StoreError::Sqlite(source) => StoreError::Script {
                    path: path.clone(),
                    source,
                },
                other => other,
            })?;

            outcome.executed.push(path);
        }

        tracing::info!(
            "{} execution completed: {} executed, {} skipped",
            kind,
            outcome.executed.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_script(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn runner_for(dir: &Path) -> ScriptRunner {
        ScriptRunner::new(&ScriptConfig {
            base_dir: dir.to_path_buf(),
            ddl: vec![],
            dml: vec![],
        })
    }

    #[test]
    fn test_discovers_sql_files_in_name_order() {
        let temp = TempDir::new().unwrap();
        create_script(temp.path(), "ddl/02_analytics.sql", "");
        create_script(temp.path(), "ddl/01_tables.sql", "");
        create_script(temp.path(), "ddl/notes.txt", "");

        let files = runner_for(temp.path()).resolve(ScriptKind::Ddl, None);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["01_tables.sql", "02_analytics.sql"]);
    }

    #[tokio::test]
    async fn test_runs_ddl_then_dml_and_skips_missing() {
        let temp = TempDir::new().unwrap();
        create_script(temp.path(), "ddl/tables.sql", "CREATE TABLE t (x INTEGER);");
        create_script(
            temp.path(),
            "dml/data.sql",
            "INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);",
        );

        let runner = ScriptRunner::new(&ScriptConfig {
            base_dir: temp.path().to_path_buf(),
            ddl: vec![PathBuf::from("ddl/tables.sql"), PathBuf::from("ddl/missing.sql")],
            dml: vec![],
        });
        let store = SqliteStore::open_in_memory().unwrap();

        let ddl = runner.run(&store, ScriptKind::Ddl, None).await.unwrap();
        assert_eq!(ddl.executed.len(), 1);
        assert_eq!(ddl.skipped.len(), 1);

        let dml = runner.run(&store, ScriptKind::Dml, None).await.unwrap();
        assert_eq!(dml.executed.len(), 1);

        let result = store.query("SELECT COUNT(*) AS n FROM t", vec![]).await.unwrap();
        assert_eq!(result.rows[0][0], serde_json::json!(2));
    }

    #[tokio::test]
    async fn test_failing_script_reports_path() {
        let temp = TempDir::new().unwrap();
        create_script(temp.path(), "ddl/broken.sql", "CREATE TABLE (;");

        let store = SqliteStore::open_in_memory().unwrap();
        let err = runner_for(temp.path())
            .run(&store, ScriptKind::Ddl, Some(Path::new("ddl/broken.sql")))
            .await
            .unwrap_err();

        match err {
            StoreError::Script { path, .. } => assert!(path.ends_with("broken.sql")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
