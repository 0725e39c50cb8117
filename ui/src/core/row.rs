//! Flat report rows and the value helpers every serializer shares.
//!
//! A [`Row`] is an insertion-ordered map of field name to a primitive JSON value.
//! Rows in one batch are not guaranteed to share a field set, so column headers are
//! always derived from the whole batch via [`collect_columns`].

use serde_json::{Map, Number, Value};

/// One flat record of named field values.
pub type Row = Map<String, Value>;

/// Markers the field teams use for "no figure" in numeric columns.
const ABSENT_MARKERS: &[&str] = &["nan", "none", "null", "n/a", "na", "-", "nil"];

/// Union of keys across `rows`, each key once, in first-seen order.
pub fn collect_columns(rows: &[Row]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Text shown for a value in any tabular output. Null becomes the empty string.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => display_number(number),
        other => other.to_string(),
    }
}

/// Text for a cell that may be missing from the row.
pub fn display_cell(row: &Row, column: &str) -> String {
    row.get(column).map(display_value).unwrap_or_default()
}

fn display_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(value) => format_plain(value),
        None => number.to_string(),
    }
}

/// Formats a float without a trailing `.0` when it is integral.
pub fn format_plain(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Parses a numeric figure, returning `None` for absent, blank or non-numeric values.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric_text(text),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Numeric value of a field for summation: anything non-numeric counts as 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    value.and_then(parse_number).unwrap_or(0.0)
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || ABSENT_MARKERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return None;
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|ch| !matches!(ch, ',' | '₹' | '$'))
        .collect();
    cleaned.trim().parse::<f64>().ok()
}

/// JSON number for a float; non-finite values collapse to 0.
pub fn number_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0))
}

/// Converts a JSON array of objects into rows, rejecting anything else.
pub fn rows_from_value(value: Value) -> Option<Vec<Row>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}
