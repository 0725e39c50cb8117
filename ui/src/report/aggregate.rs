//! Grouping of flat rows into summary records.
//!
//! One synchronous pass: every row resolves its group key, unseen keys get a zeroed
//! record, requested fields are summed with [`coerce_number`], and rates are derived
//! once all rows are in. Output order is the order in which keys were first seen.

use std::collections::HashMap;

use serde_json::Value;

use crate::core::districts;
use crate::core::row::{coerce_number, display_value, number_value, Row};

/// Column holding the number of rows folded into a record.
pub const RECORDS_COLUMN: &str = "records";

/// How a row's group key is derived.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    /// Display text of a single field.
    Field(String),
    /// Several fields joined by `separator`; every part must be present.
    Composite {
        fields: Vec<String>,
        separator: String,
    },
    /// A district field, normalised to its canonical spelling.
    District(String),
}

impl GroupKey {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn composite(fields: &[&str], separator: impl Into<String>) -> Self {
        Self::Composite {
            fields: fields.iter().map(|field| field.to_string()).collect(),
            separator: separator.into(),
        }
    }

    /// Key for `row`, or `None` when the key field is absent, null or blank.
    pub fn extract(&self, row: &Row) -> Option<String> {
        match self {
            Self::Field(name) => key_text(row.get(name)),
            Self::Composite { fields, separator } => {
                let parts = fields
                    .iter()
                    .map(|field| key_text(row.get(field)))
                    .collect::<Option<Vec<_>>>()?;
                Some(parts.join(separator))
            }
            Self::District(name) => {
                key_text(row.get(name)).map(|raw| districts::canonical_name(&raw))
            }
        }
    }
}

fn key_text(value: Option<&Value>) -> Option<String> {
    let text = display_value(value?);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// What happens to rows whose key cannot be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MissingKey {
    /// Leave the row out of every group.
    #[default]
    Skip,
    /// Fold the row into a group with this label.
    Bucket(String),
}

/// A percentage derived from two summed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSpec {
    pub name: String,
    pub numerator: String,
    pub denominator: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub key: GroupKey,
    pub sums: Vec<String>,
    pub rates: Vec<RateSpec>,
    pub missing_key: MissingKey,
}

impl Aggregation {
    pub fn by(key: GroupKey) -> Self {
        Self {
            key,
            sums: Vec::new(),
            rates: Vec::new(),
            missing_key: MissingKey::default(),
        }
    }

    pub fn sum(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.sums.contains(&field) {
            self.sums.push(field);
        }
        self
    }

    /// Adds `name = numerator / denominator * 100`; both fields are summed as well.
    pub fn rate(
        self,
        name: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        let numerator = numerator.into();
        let denominator = denominator.into();
        let mut next = self.sum(numerator.clone()).sum(denominator.clone());
        next.rates.push(RateSpec {
            name: name.into(),
            numerator,
            denominator,
        });
        next
    }

    pub fn missing_key(mut self, policy: MissingKey) -> Self {
        self.missing_key = policy;
        self
    }

    pub fn run(&self, rows: &[Row]) -> Vec<SummaryRecord> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut records: Vec<SummaryRecord> = Vec::new();
        let mut skipped = 0usize;

        for row in rows {
            let key = match (self.key.extract(row), &self.missing_key) {
                (Some(key), _) => key,
                (None, MissingKey::Bucket(label)) => label.clone(),
                (None, MissingKey::Skip) => {
                    skipped += 1;
                    continue;
                }
            };

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                records.push(SummaryRecord::zeroed(key, &self.sums));
                records.len() - 1
            });
            let record = &mut records[slot];
            record.rows += 1;
            for (field, total) in record.totals.iter_mut() {
                *total += coerce_number(row.get(field.as_str()));
            }
        }

        for record in &mut records {
            record.rates = self
                .rates
                .iter()
                .map(|rate| {
                    let value = compute_rate(
                        record.total(&rate.numerator),
                        record.total(&rate.denominator),
                    );
                    (rate.name.clone(), value)
                })
                .collect();
        }

        if skipped > 0 {
            tracing::debug!(
                skipped,
                groups = records.len(),
                "rows without a group key were skipped"
            );
        }

        records
    }
}

/// `numerator / denominator * 100`, or 0 when the denominator is 0 or the result is not finite.
pub fn compute_rate(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let rate = numerator / denominator * 100.0;
    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

/// Totals for one group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub key: String,
    /// Number of rows folded into this record.
    pub rows: usize,
    pub totals: Vec<(String, f64)>,
    pub rates: Vec<(String, f64)>,
}

impl SummaryRecord {
    fn zeroed(key: String, fields: &[String]) -> Self {
        Self {
            key,
            rows: 0,
            totals: fields.iter().map(|field| (field.clone(), 0.0)).collect(),
            rates: Vec::new(),
        }
    }

    /// Summed value of `field`; 0 when the field was not aggregated.
    pub fn total(&self, field: &str) -> f64 {
        self.totals
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| *value)
            .unwrap_or(0.0)
    }

    pub fn rate(&self, name: &str) -> Option<f64> {
        self.rates
            .iter()
            .find(|(rate, _)| rate == name)
            .map(|(_, value)| *value)
    }

    /// Flattens the record for export: key column, row count, totals, then rates
    /// rounded to two decimals.
    ///
    /// A total or rate whose name is already taken (by the key column, `records` or an
    /// earlier figure) is written under a suffixed column instead of replacing it.
    pub fn to_row(&self, key_column: &str) -> Row {
        let mut row = Row::new();
        row.insert(key_column.to_string(), Value::String(self.key.clone()));
        insert_unclaimed(&mut row, RECORDS_COLUMN, "count", Value::from(self.rows));
        for (field, total) in &self.totals {
            insert_unclaimed(&mut row, field, "total", number_value(*total));
        }
        for (name, rate) in &self.rates {
            let rounded = number_value((rate * 100.0).round() / 100.0);
            insert_unclaimed(&mut row, name, "rate", rounded);
        }
        row
    }
}

fn insert_unclaimed(row: &mut Row, name: &str, suffix: &str, value: Value) {
    let mut column = name.to_string();
    let mut attempt = 1;
    while row.contains_key(&column) {
        column = match attempt {
            1 => format!("{name}_{suffix}"),
            n => format!("{name}_{suffix}_{n}"),
        };
        attempt += 1;
    }
    if column != name {
        tracing::debug!(field = name, column = %column, "export column renamed to avoid a clash");
    }
    row.insert(column, value);
}
