use dioxus::prelude::*;

use crate::core::config::ExportConfig;
use crate::report::{ReportExportPanel, ReportKind, ReportState, ReportSummaryTable};

#[component]
pub fn Reports() -> Element {
    let config = use_context::<ExportConfig>();
    let state = use_signal(|| ReportState::load(&config));
    let mut kind = use_signal(|| ReportKind::DistrictDcb);

    let current = kind();
    let records = current.summarize(&state().rows);
    let export_rows = current.export_rows(&records);
    let export_title = current.export_title();

    rsx! {
        section { class: "page page-reports",
            h1 { "Reports" }
            p { "Pick a summary, check the totals, then export it for sharing or printing." }

            if let Some(err) = state().error {
                p { class: "report-card__meta report-card__meta--error", "⚠️ {err}" }
            }

            div { class: "reports__tabs", role: "tablist",
                for option in ReportKind::ALL {
                    button {
                        key: "{option.title()}",
                        r#type: "button",
                        role: "tab",
                        class: if option == current { "reports__tab reports__tab--active" } else { "reports__tab" },
                        onclick: move |_| kind.set(option),
                        "{option.title()}"
                    }
                }
            }

            div { class: "reports__panels",
                ReportSummaryTable { kind: current, records: records }
                ReportExportPanel { key: "{export_title}", title: export_title.clone(), rows: export_rows }
            }
        }
    }
}
