//! @ai:module:intent Validate fetched rows into metric records
//! @ai:module:layer infrastructure
//! @ai:module:public_api records_from_rows, record_from_row
//! @ai:module:stateless true

use crate::error::AnalysisError;
use crate::metrics::{MetricRecord, ProcessingMethod};
use crate::store::Row;
use serde_json::Value;

const METHOD_FIELDS: &[&str] = &["processing_method", "context_method"];
const TIME_FIELDS: &[&str] = &["response_time_ms", "avg_response_time_ms"];
const COST_FIELDS: &[&str] = &["cost_usd", "avg_cost_usd"];
const QUALITY_FIELDS: &[&str] = &["quality_score", "avg_quality_score"];
const SATISFACTION_FIELDS: &[&str] = &["user_satisfaction", "avg_user_satisfaction"];
const TOKEN_FIELDS: &[&str] = &["tokens_used", "token_count"];
const WEIGHT_FIELDS: &[&str] = &["total_interactions", "query_count"];

const MIN_SATISFACTION: f64 = 1.0;
const MAX_SATISFACTION: f64 = 5.0;

/// Context shared by every field check of one row.
struct RowContext<'a> {
    index: usize,
    method: &'a str,
}

impl RowContext<'_> {
    fn malformed(&self, field: &str, reason: impl Into<String>) -> AnalysisError {
        AnalysisError::MalformedRecord {
            row: self.index,
            method: self.method.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// @ai:intent Find the first present, non-null value among field aliases
/// @ai:effects pure
fn lookup<'a>(row: &'a Row, aliases: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    aliases
        .iter()
        .find_map(|name| row.get(*name).filter(|v| !v.is_null()).map(|v| (*name, v)))
}

/// @ai:intent Read a number from a JSON number or a numeric string
/// @ai:effects pure
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|n| n.is_finite())
}

/// @ai:intent Read a required numeric field within bounds
/// @ai:effects pure
fn required_number(
    row: &Row,
    ctx: &RowContext<'_>,
    aliases: &[&'static str],
    min: f64,
    max: f64,
) -> Result<f64, AnalysisError> {
    let (name, value) =
        lookup(row, aliases).ok_or_else(|| ctx.malformed(aliases[0], "is missing"))?;

    let number = as_number(value)
        .ok_or_else(|| ctx.malformed(name, format!("is not a number: {}", value)))?;

    if number < min || number > max {
        return Err(ctx.malformed(
            name,
            format!("{} is outside the range [{}, {}]", number, min, max),
        ));
    }

    Ok(number)
}

/// @ai:intent Read an optional integer field within bounds
/// @ai:effects pure
fn optional_integer(
    row: &Row,
    ctx: &RowContext<'_>,
    aliases: &[&'static str],
    min: f64,
    max: f64,
) -> Result<Option<f64>, AnalysisError> {
    let Some((name, value)) = lookup(row, aliases) else {
        return Ok(None);
    };

    let number = as_number(value)
        .ok_or_else(|| ctx.malformed(name, format!("is not a number: {}", value)))?;

    if number < min || number > max {
        return Err(ctx.malformed(
            name,
            format!("{} is outside the range [{}, {}]", number, min, max),
        ));
    }

    Ok(Some(number.round()))
}

/// @ai:intent Validate a single row into a metric record
/// @ai:pre index identifies the row for error messages
/// @ai:effects pure
pub fn record_from_row(index: usize, row: &Row) -> Result<MetricRecord, AnalysisError> {
    let unknown = RowContext {
        index,
        method: "<unknown>",
    };

    let (field, raw_method) = lookup(row, METHOD_FIELDS)
        .ok_or_else(|| unknown.malformed(METHOD_FIELDS[0], "is missing"))?;

    let method_name = raw_method
        .as_str()
        .ok_or_else(|| unknown.malformed(field, format!("is not a string: {}", raw_method)))?;

    let method: ProcessingMethod = method_name
        .parse()
        .map_err(|reason: String| unknown.malformed(field, reason))?;

    let ctx = RowContext {
        index,
        method: method.as_str(),
    };

    let response_time_ms = required_number(row, &ctx, TIME_FIELDS, 0.0, f64::MAX)?;
    let cost_usd = required_number(row, &ctx, COST_FIELDS, 0.0, f64::MAX)?;
    let quality_score = required_number(row, &ctx, QUALITY_FIELDS, 0.0, 1.0)?;

    let user_satisfaction =
        optional_integer(row, &ctx, SATISFACTION_FIELDS, MIN_SATISFACTION, MAX_SATISFACTION)?
            .map(|s| s as u8);
    let tokens_used =
        optional_integer(row, &ctx, TOKEN_FIELDS, 0.0, u64::MAX as f64)?.map(|t| t as u64);
    // A rollup row stands for the interactions behind it.
    let weight =
        optional_integer(row, &ctx, WEIGHT_FIELDS, 1.0, u64::MAX as f64)?.map(|w| w as u64);

    Ok(MetricRecord {
        method,
        response_time_ms,
        cost_usd,
        quality_score,
        user_satisfaction,
        tokens_used,
        weight,
    })
}

/// @ai:intent Validate every row; the first malformed row aborts the conversion
/// @ai:effects pure
pub fn records_from_rows(rows: &[Row]) -> Result<Vec<MetricRecord>, AnalysisError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| record_from_row(i, row))
        .collect()
}
