use dioxus::prelude::*;

use crate::core::config::ExportConfig;
use crate::core::platform::{Platform, PrintMode};
use crate::core::row::Row;
use crate::report::{ExportContext, ExportFormat, ExportJob};

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

#[component]
pub fn ReportExportPanel(title: String, rows: Vec<Row>) -> Element {
    let config = use_context::<ExportConfig>();
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(label) => Some((
            "report-card__meta".to_string(),
            format!("Preparing {label}…"),
        )),
        ExportStatus::Done(message) => Some((
            "report-card__meta report-card__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "report-card__meta report-card__meta--error".to_string(),
            format!("⚠️ Export failed: {err}"),
        )),
    };

    let pdf_hint = match Platform::current().print_mode() {
        PrintMode::Dialog => "PDF opens the print dialog; choose “Save as PDF” there.",
        PrintMode::PdfFile => "PDF is rendered on this device and saved with the other exports.",
    };

    let actions: Vec<_> = ExportFormat::ALL
        .into_iter()
        .map(|format| {
            let label = format!("Export {}", format.label());
            let handler = export_handler(format, &title, &rows, &config, status, busy);
            (format.label(), button_class(format), label, handler)
        })
        .collect();

    rsx! {
        section { class: "report-card report-export",
            div { class: "report-card__header",
                h2 { "Export" }
            }

            if rows.is_empty() {
                p { class: "report-card__placeholder", "Exports unlock once collection data is available." }
            } else {
                p { "Share this summary as a spreadsheet or a printable document." }
                p { class: "report-card__meta", "{pdf_hint}" }

                div { class: "report-export__actions",
                    for (key, class_name, label, handler) in actions {
                        button {
                            key: "{key}",
                            r#type: "button",
                            class: "{class_name}",
                            disabled: busy(),
                            onclick: handler,
                            "{label}"
                        }
                    }
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}

fn button_class(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv => "button button--primary",
        ExportFormat::ExcelHtml => "button",
        ExportFormat::Pdf => "button button--ghost",
    }
}

fn export_handler(
    format: ExportFormat,
    title: &str,
    rows: &[Row],
    config: &ExportConfig,
    mut status: Signal<ExportStatus>,
    mut busy: Signal<bool>,
) -> impl FnMut(MouseEvent) + 'static {
    let title = title.to_string();
    let rows = rows.to_vec();
    let config = config.clone();

    move |_| {
        if busy() {
            return;
        }
        busy.set(true);
        status.set(ExportStatus::Working(format.label()));

        let job = ExportJob::new(format, title.clone(), rows.clone());
        let config = config.clone();
        spawn(async move {
            let outcome = ExportContext::for_platform(config).and_then(|context| job.run(&context));
            match outcome {
                Ok(outcome) => status.set(ExportStatus::Done(outcome.message())),
                Err(err) => {
                    tracing::error!(format = format.label(), "export failed: {err}");
                    status.set(ExportStatus::Error(err.to_string()));
                }
            }
            busy.set(false);
        });
    }
}
