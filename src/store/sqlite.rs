//! @ai:module:intent SQLite implementation of the metrics store
//! @ai:module:layer infrastructure
//! @ai:module:public_api SqliteStore
//! @ai:module:stateless false

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::store::{MetricsStore, QueryResult};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use serde_json::{Number, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// @ai:intent SQLite-backed store; blocking calls run on the tokio blocking pool
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// @ai:intent Open (or create) a database file
    /// @ai:effects fs:write
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let path = config.path.as_path();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure(&conn, config.busy_timeout_ms)?;

        tracing::info!("Opened SQLite database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// @ai:intent Open a private in-memory database
    /// @ai:effects pure
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn, 0)?;
        Ok(Self::from_connection(conn))
    }

    /// @ai:intent Open a database file with default settings
    /// @ai:effects fs:write
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        Self::open(&DatabaseConfig {
            path: path.to_path_buf(),
            ..Default::default()
        })
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn configure(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        Ok(())
    }

    /// @ai:intent Run a closure against the connection on the blocking pool
    /// @ai:effects io
    async fn with_conn<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&Connection) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            // A panic in another caller does not leave the connection unusable.
            let guard = conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

/// @ai:intent Convert a JSON parameter into a SQLite value
/// @ai:effects pure
fn to_sql_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(b as i64),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => SqlValue::Text(s),
        other => SqlValue::Text(other.to_string()),
    }
}

/// @ai:intent Convert a SQLite column value into JSON
/// @ai:effects pure
fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<blob {} bytes>", bytes.len())),
    }
}

impl MetricsStore for SqliteStore {
    /// @ai:intent Execute a batch of SQL statements atomically
    /// @ai:post a failing statement rolls back the whole batch
    /// @ai:effects db:write
    async fn execute_script(&self, sql: &str) -> Result<(), StoreError> {
        let sql = sql.to_string();

        self.with_conn(move |conn| {
            // Dropping the transaction without commit rolls it back.
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(&sql)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    /// @ai:intent Run a parameterized query and collect every row
    /// @ai:effects db:read
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<QueryResult, StoreError> {
        let sql = sql.to_string();

        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let width = columns.len();

            let params: Vec<SqlValue> = params.into_iter().map(to_sql_value).collect();
            let mut rows = stmt.query(rusqlite::params_from_iter(params))?;
            let mut collected = Vec::new();

            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(width);

                for i in 0..width {
                    values.push(from_value_ref(row.get_ref(i)?));
                }

                collected.push(values);
            }

            tracing::debug!("Query returned {} rows", collected.len());
            Ok(QueryResult {
                columns,
                rows: collected,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_script_and_query_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .execute_script(
                "CREATE TABLE samples (method TEXT NOT NULL, time_ms INTEGER, cost REAL, note TEXT);
                 INSERT INTO samples VALUES ('RAG', 500, 0.002, NULL);
                 INSERT INTO samples VALUES ('CONTEXT_DUMP', 3000, 0.02, 'slow');",
            )
            .await
            .unwrap();

        let result = store
            .query(
                "SELECT method, time_ms, cost, note FROM samples WHERE time_ms > ?1 ORDER BY time_ms",
                vec![json!(100)],
            )
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["method", "time_ms", "cost", "note"]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0], vec![json!("RAG"), json!(500), json!(0.002), Value::Null]);
        assert_eq!(result.rows[1][3], json!("slow"));
    }

    #[tokio::test]
    async fn test_failing_script_leaves_no_partial_writes() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.execute_script("CREATE TABLE t (x INTEGER);").await.unwrap();

        let result = store
            .execute_script("INSERT INTO t VALUES (1); INSERT INTO missing_table VALUES (2);")
            .await;
        assert!(result.is_err());

        let count = store.query("SELECT COUNT(*) FROM t", vec![]).await.unwrap();
        assert_eq!(count.rows[0][0], json!(0));
    }

    #[tokio::test]
    async fn test_invalid_sql_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.query("SELECT * FROM missing_table", vec![]).await.unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[tokio::test]
    async fn test_open_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("brain.db");

        let store = SqliteStore::open_path(&path).unwrap();
        store.execute_script("CREATE TABLE t (x INTEGER);").await.unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_parameter_conversion() {
        assert_eq!(to_sql_value(json!(3)), SqlValue::Integer(3));
        assert_eq!(to_sql_value(json!(0.5)), SqlValue::Real(0.5));
        assert_eq!(to_sql_value(json!(true)), SqlValue::Integer(1));
        assert_eq!(to_sql_value(json!("RAG")), SqlValue::Text("RAG".to_string()));
        assert_eq!(to_sql_value(Value::Null), SqlValue::Null);
    }
}
