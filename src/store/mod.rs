//! @ai:module:intent Data access: SQL execution, row fetching and script loading
//! @ai:module:layer infrastructure
//! @ai:module:public_api MetricsStore, QueryResult, Row, SqliteStore, ScriptRunner, TableViewQuery

pub mod rows;
pub mod scripts;
pub mod sqlite;
pub mod view;

pub use rows::records_from_rows;
pub use scripts::{ScriptKind, ScriptOutcome, ScriptRunner};
pub use sqlite::SqliteStore;
pub use view::TableViewQuery;

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fetched row as a mapping from column name to value.
pub type Row = serde_json::Map<String, Value>;

/// @ai:intent Trait for the SQL execution facility
#[allow(async_fn_in_trait)]
pub trait MetricsStore: Send + Sync {
    /// @ai:intent Execute a batch of SQL statements
    async fn execute_script(&self, sql: &str) -> Result<(), StoreError>;

    /// @ai:intent Run a parameterized query and collect every row
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<QueryResult, StoreError>;
}

/// @ai:intent Rows returned by a query, with column order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// @ai:intent Convert rows into column-name keyed maps
    /// @ai:effects pure
    pub fn to_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|values| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
