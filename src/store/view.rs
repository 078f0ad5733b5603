//! @ai:module:intent Build safe "view table" queries
//! @ai:module:layer infrastructure
//! @ai:module:public_api TableViewQuery
//! @ai:module:stateless true

use crate::error::StoreError;
use regex::Regex;

/// @ai:intent Builds `SELECT *` previews with validated identifiers
///
/// Table and column names cannot be bound as parameters, so they are checked
/// against a plain `[schema.]name` pattern before being spliced in.
pub struct TableViewQuery {
    identifier: Regex,
}

impl TableViewQuery {
    /// @ai:intent Create a new query builder
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").unwrap(),
        }
    }

    /// @ai:intent Reject anything that is not a plain identifier
    /// @ai:effects pure
    pub fn validate<'a>(&self, name: &'a str) -> Result<&'a str, StoreError> {
        if self.identifier.is_match(name) {
            Ok(name)
        } else {
            Err(StoreError::InvalidIdentifier(name.to_string()))
        }
    }

    /// @ai:intent Build the preview SQL; the row limit is bound as parameter ?1
    /// @ai:effects pure
    pub fn build(&self, table: &str, order_by: Option<&str>) -> Result<String, StoreError> {
        let table = self.validate(table)?;

        let sql = match order_by {
            Some(column) => format!(
                "SELECT * FROM {} ORDER BY {} DESC LIMIT ?1",
                table,
                self.validate(column)?
            ),
            None => format!("SELECT * FROM {} LIMIT ?1", table),
        };

        Ok(sql)
    }
}

impl Default for TableViewQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_order() {
        let query = TableViewQuery::new();
        assert_eq!(
            query.build("brain_queries", Some("created_at")).unwrap(),
            "SELECT * FROM brain_queries ORDER BY created_at DESC LIMIT ?1"
        );
    }

    #[test]
    fn test_build_with_schema_and_no_order() {
        let query = TableViewQuery::new();
        assert_eq!(
            query.build("main.brain_analytics", None).unwrap(),
            "SELECT * FROM main.brain_analytics LIMIT ?1"
        );
    }

    #[test]
    fn test_rejects_injection() {
        let query = TableViewQuery::new();
        assert!(matches!(
            query.build("brain_queries; DROP TABLE x", None),
            Err(StoreError::InvalidIdentifier(_))
        ));
        assert!(query.build("brain_queries", Some("created_at desc --")).is_err());
        assert!(query.validate("1table").is_err());
    }
}
