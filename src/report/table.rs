//! @ai:module:intent Fixed-width text rendering of query results
//! @ai:module:layer presentation
//! @ai:module:public_api TableRenderer
//! @ai:module:stateless true

use crate::config::ViewConfig;
use crate::store::QueryResult;
use serde_json::Value;

const ELLIPSIS: &str = "...";
const NULL: &str = "NULL";

/// @ai:intent Renders query results as a plain-text table with row and column caps
pub struct TableRenderer {
    max_rows: usize,
    max_cols: usize,
}

impl TableRenderer {
    /// @ai:intent Create a renderer; caps below 1 are raised to 1
    /// @ai:effects pure
    pub fn new(max_rows: usize, max_cols: usize) -> Self {
        Self {
            max_rows: max_rows.max(1),
            max_cols: max_cols.max(1),
        }
    }

    /// @ai:intent Format a single cell
    /// @ai:effects pure
    fn cell(value: &Value) -> String {
        match value {
            Value::Null => NULL.to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// @ai:intent Render the result; hidden columns and rows are summarised
    /// @ai:effects pure
    pub fn render(&self, result: &QueryResult) -> String {
        if result.columns.is_empty() {
            return "(no columns)\n".to_string();
        }

        let shown_cols = result.columns.len().min(self.max_cols);
        let hidden_cols = result.columns.len() - shown_cols;

        let mut header: Vec<String> = result.columns[..shown_cols].to_vec();
        if hidden_cols > 0 {
            header.push(ELLIPSIS.to_string());
        }

        let body: Vec<Vec<String>> = result
            .rows
            .iter()
            .take(self.max_rows)
            .map(|row| {
                let mut cells: Vec<String> = row.iter().take(shown_cols).map(Self::cell).collect();
                if hidden_cols > 0 {
                    cells.push(ELLIPSIS.to_string());
                }
                cells
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                body.iter()
                    .filter_map(|r| r.get(i))
                    .chain(std::iter::once(&header[i]))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_row = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut output = String::new();
        output.push_str(&format_row(&header));
        output.push('\n');
        output.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
        output.push('\n');

        for row in &body {
            output.push_str(&format_row(row));
            output.push('\n');
        }

        let hidden_rows = result.rows.len().saturating_sub(self.max_rows);
        if hidden_rows > 0 {
            output.push_str(&format!("... {} more rows\n", hidden_rows));
        }

        output.push_str(&format!(
            "[{} rows x {} columns]\n",
            result.rows.len(),
            result.columns.len()
        ));
        output
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}

impl From<&ViewConfig> for TableRenderer {
    fn from(config: &ViewConfig) -> Self {
        Self::new(config.max_rows, config.max_cols)
    }
}
