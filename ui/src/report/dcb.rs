//! Demand-collection-balance figures for one institution row.
//!
//! Field teams often leave derived columns blank. Totals fall back to the sum of their
//! arrears and current parts (never below zero); balances fall back to demand minus
//! collection. Figures that are present are kept as supplied.

use crate::core::row::{coerce_number, number_value, parse_number, Row};

pub const DEMAND_ARREARS: &str = "demand_arrears";
pub const DEMAND_CURRENT: &str = "demand_current";
pub const DEMAND_TOTAL: &str = "demand_total";
pub const COLLECTION_ARREARS: &str = "collection_arrears";
pub const COLLECTION_CURRENT: &str = "collection_current";
pub const COLLECTION_TOTAL: &str = "collection_total";
pub const BALANCE_ARREARS: &str = "balance_arrears";
pub const BALANCE_CURRENT: &str = "balance_current";
pub const BALANCE_TOTAL: &str = "balance_total";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DcbFigures {
    pub demand_arrears: f64,
    pub demand_current: f64,
    pub demand_total: f64,
    pub collection_arrears: f64,
    pub collection_current: f64,
    pub collection_total: f64,
    pub balance_arrears: f64,
    pub balance_current: f64,
    pub balance_total: f64,
}

impl DcbFigures {
    pub fn from_row(row: &Row) -> Self {
        let supplied = |field: &str| row.get(field).and_then(parse_number);
        let part = |field: &str| coerce_number(row.get(field));

        let demand_arrears = part(DEMAND_ARREARS);
        let demand_current = part(DEMAND_CURRENT);
        let collection_arrears = part(COLLECTION_ARREARS);
        let collection_current = part(COLLECTION_CURRENT);

        let demand_total =
            supplied(DEMAND_TOTAL).unwrap_or_else(|| (demand_arrears + demand_current).max(0.0));
        let collection_total = supplied(COLLECTION_TOTAL)
            .unwrap_or_else(|| (collection_arrears + collection_current).max(0.0));
        let balance_arrears =
            supplied(BALANCE_ARREARS).unwrap_or(demand_arrears - collection_arrears);
        let balance_current =
            supplied(BALANCE_CURRENT).unwrap_or(demand_current - collection_current);
        let balance_total = supplied(BALANCE_TOTAL).unwrap_or(balance_arrears + balance_current);

        Self {
            demand_arrears,
            demand_current,
            demand_total,
            collection_arrears,
            collection_current,
            collection_total,
            balance_arrears,
            balance_current,
            balance_total,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 9] {
        [
            (DEMAND_ARREARS, self.demand_arrears),
            (DEMAND_CURRENT, self.demand_current),
            (DEMAND_TOTAL, self.demand_total),
            (COLLECTION_ARREARS, self.collection_arrears),
            (COLLECTION_CURRENT, self.collection_current),
            (COLLECTION_TOTAL, self.collection_total),
            (BALANCE_ARREARS, self.balance_arrears),
            (BALANCE_CURRENT, self.balance_current),
            (BALANCE_TOTAL, self.balance_total),
        ]
    }
}

/// Copy of `row` with all nine DCB figures present as numbers. Fields already in the
/// row keep their position; missing ones are appended in DCB order.
pub fn normalize_row(row: &Row) -> Row {
    let figures = DcbFigures::from_row(row);
    let mut normalized = row.clone();
    for (field, value) in figures.fields() {
        normalized.insert(field.to_string(), number_value(value));
    }
    normalized
}
