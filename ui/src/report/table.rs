use dioxus::prelude::*;

use crate::core::format::{format_amount, format_rate};
use crate::report::{dcb, ReportKind, SummaryRecord, COLLECTION_RATE};

#[component]
pub fn ReportSummaryTable(kind: ReportKind, records: Vec<SummaryRecord>) -> Element {
    let shows_balance = kind != ReportKind::InspectorCollections;
    let demand: f64 = records.iter().map(|record| record.total(dcb::DEMAND_TOTAL)).sum();
    let collected: f64 = records.iter().map(|record| record.total(dcb::COLLECTION_TOTAL)).sum();
    let totals = format!(
        "Demand {} · Collected {}",
        format_amount(demand),
        format_amount(collected)
    );
    let heading = kind.title();
    let key_column = kind.key_column();

    let lines: Vec<SummaryLine> = records.iter().map(SummaryLine::from_record).collect();

    rsx! {
        section { class: "report-card report-summary",
            div { class: "report-card__header",
                h2 { "{heading}" }
                if !records.is_empty() {
                    span { class: "report-card__meta", "{records.len()} groups" }
                }
            }

            if records.is_empty() {
                p { class: "report-card__placeholder",
                    "No rows to summarise yet. Import a collection snapshot to see totals here."
                }
            } else {
                p { class: "report-summary__totals", "{totals}" }
                table { class: "report-table",
                    thead {
                        tr {
                            th { "{key_column}" }
                            th { class: "report-table__num", "Rows" }
                            th { class: "report-table__num", "Demand" }
                            th { class: "report-table__num", "Collection" }
                            if shows_balance {
                                th { class: "report-table__num", "Balance" }
                            }
                            th { class: "report-table__num", "Rate" }
                        }
                    }
                    tbody {
                        for line in lines.into_iter() {
                            {render_line(line, shows_balance)}
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone)]
struct SummaryLine {
    key: String,
    rows: usize,
    demand: String,
    collection: String,
    balance: String,
    rate: String,
}

impl SummaryLine {
    fn from_record(record: &SummaryRecord) -> Self {
        Self {
            key: record.key.clone(),
            rows: record.rows,
            demand: format_amount(record.total(dcb::DEMAND_TOTAL)),
            collection: format_amount(record.total(dcb::COLLECTION_TOTAL)),
            balance: format_amount(record.total(dcb::BALANCE_TOTAL)),
            rate: format_rate(record.rate(COLLECTION_RATE).unwrap_or(0.0)),
        }
    }
}

fn render_line(line: SummaryLine, shows_balance: bool) -> Element {
    let SummaryLine {
        key,
        rows,
        demand,
        collection,
        balance,
        rate,
    } = line;

    rsx! {
        tr { key: "{key}",
            td { "{key}" }
            td { class: "report-table__num", "{rows}" }
            td { class: "report-table__num", "{demand}" }
            td { class: "report-table__num", "{collection}" }
            if shows_balance {
                td { class: "report-table__num", "{balance}" }
            }
            td { class: "report-table__num", "{rate}" }
        }
    }
}
