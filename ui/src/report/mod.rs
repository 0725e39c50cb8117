//! Aggregated DCB reports and their export pipeline.

pub mod aggregate;
pub mod csv;
pub mod dcb;
mod error;
pub mod job;
#[cfg(not(target_arch = "wasm32"))]
pub mod pdf;
pub mod print;
pub mod sheet;
pub mod sink;
pub mod utils;

mod panel;
pub use panel::ReportExportPanel;

mod table;
pub use table::ReportSummaryTable;

pub use aggregate::{Aggregation, GroupKey, MissingKey, SummaryRecord};
pub use error::ExportError;
pub use job::{ExportContext, ExportFormat, ExportJob, ExportOutcome};
pub use print::{PrintDocument, PrintRenderer};
#[cfg(not(target_arch = "wasm32"))]
pub use sink::FileSink;
pub use sink::{Artifact, ArtifactSink, SavedTo, ShareOutcome, SinkReport};

use serde_json::Value;

use crate::core::config::ExportConfig;
use crate::core::districts;
use crate::core::row::Row;
use crate::core::storage;

pub const DISTRICT_FIELD: &str = "district";
pub const INSTITUTION_FIELD: &str = "institution_name";
pub const INSPECTOR_FIELD: &str = "inspector_name";
pub const COLLECTION_RATE: &str = "collection_rate";

/// The summaries offered on the reports screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    DistrictDcb,
    InstitutionDcb,
    InspectorCollections,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        Self::DistrictDcb,
        Self::InstitutionDcb,
        Self::InspectorCollections,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::DistrictDcb => "District DCB",
            Self::InstitutionDcb => "Institution DCB",
            Self::InspectorCollections => "Inspector collections",
        }
    }

    /// Header of the key column in exported rows.
    pub fn key_column(self) -> &'static str {
        match self {
            Self::DistrictDcb => DISTRICT_FIELD,
            Self::InstitutionDcb => INSTITUTION_FIELD,
            Self::InspectorCollections => "inspector",
        }
    }

    pub fn aggregation(self) -> Aggregation {
        match self {
            Self::DistrictDcb => Aggregation::by(GroupKey::District(DISTRICT_FIELD.into()))
                .sum(dcb::DEMAND_TOTAL)
                .sum(dcb::COLLECTION_TOTAL)
                .sum(dcb::BALANCE_TOTAL)
                .rate(COLLECTION_RATE, dcb::COLLECTION_TOTAL, dcb::DEMAND_TOTAL),
            Self::InstitutionDcb => Aggregation::by(GroupKey::field(INSTITUTION_FIELD))
                .sum(dcb::DEMAND_TOTAL)
                .sum(dcb::COLLECTION_TOTAL)
                .sum(dcb::BALANCE_TOTAL)
                .rate(COLLECTION_RATE, dcb::COLLECTION_TOTAL, dcb::DEMAND_TOTAL),
            Self::InspectorCollections => {
                Aggregation::by(GroupKey::composite(&[INSPECTOR_FIELD, DISTRICT_FIELD], " · "))
                    .rate(COLLECTION_RATE, dcb::COLLECTION_TOTAL, dcb::DEMAND_TOTAL)
            }
        }
    }

    /// DCB-normalises `rows`, spells districts canonically and groups them.
    pub fn summarize(self, rows: &[Row]) -> Vec<SummaryRecord> {
        let rows: Vec<Row> = rows
            .iter()
            .map(|row| {
                let mut row = dcb::normalize_row(row);
                if let Some(Value::String(district)) = row.get_mut(DISTRICT_FIELD) {
                    *district = districts::canonical_name(district);
                }
                row
            })
            .collect();
        self.aggregation().run(&rows)
    }

    pub fn export_rows(self, records: &[SummaryRecord]) -> Vec<Row> {
        records.iter().map(|record| record.to_row(self.key_column())).collect()
    }

    pub fn export_title(self) -> String {
        format!("{} report", self.title())
    }
}

/// Rows behind the reports screen, or why they could not be loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportState {
    pub rows: Vec<Row>,
    pub error: Option<String>,
}

impl ReportState {
    pub fn load(config: &ExportConfig) -> Self {
        match storage::load_rows(config) {
            Ok(rows) => Self { rows, error: None },
            Err(err) => {
                tracing::warn!("snapshot load failed: {err}");
                Self {
                    rows: Vec::new(),
                    error: Some(format!("Couldn't load collection data: {err}")),
                }
            }
        }
    }
}
