use dioxus::prelude::*;

use crate::core::config::ExportConfig;
use crate::core::platform::Platform;
use crate::report::ReportState;

#[component]
pub fn Home() -> Element {
    let config = use_context::<ExportConfig>();
    let state = use_signal(|| ReportState::load(&config));
    let loaded = state().rows.len();
    let platform = Platform::current().label();

    rsx! {
        section { class: "page page-home",
            h1 { "Waqf Collections" }
            p { "Demand, collection and balance figures for every district, institution and inspector." }
            p {
                "Summaries are built from the collection snapshot on this device and can be shared as CSV, Excel or PDF."
            }

            ul { class: "page-home__features",
                li { "District DCB totals with collection rates" }
                li { "Institution-level demand and arrears" }
                li { "Inspector collections per district" }
            }

            if let Some(err) = state().error {
                p { class: "page-home__status page-home__status--error", "⚠️ {err}" }
            } else {
                p { class: "page-home__status", "{loaded} rows available on {platform}." }
            }
        }
    }
}
