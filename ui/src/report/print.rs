//! Printable rendition of a report and the per-platform ways of getting it out of the app.

use time::OffsetDateTime;

use super::job::ExportOutcome;
use super::sheet::{body_row, escape_html, header_row};
use super::ExportError;
use crate::core::config::ExportConfig;
use crate::core::platform::{Platform, PrintMode};
use crate::core::row::{collect_columns, display_cell, Row};

pub const PDF_MIME: &str = "application/pdf";
pub const PDF_DIALOG_TITLE: &str = "Export PDF report";

const PRINT_CSS: &str = "\
@page { size: A4 landscape; margin: 12mm; }
body { font-family: 'Noto Sans', Arial, sans-serif; font-size: 10px; color: #1d232b; }
h1 { font-size: 16px; margin: 0 0 4px; }
.meta { color: #5b6673; margin: 0 0 8px; }
.warning { border: 1px solid #d08c00; background: #fff6e0; padding: 6px 8px; margin: 0 0 8px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #c5ccd4; padding: 3px 5px; text-align: left; }
th { background: #eef1f4; }
tr { page-break-inside: avoid; }
";

/// The rows of a report that fit the print budget, plus what was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintDocument {
    pub title: String,
    pub generated: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub total_rows: usize,
}

impl PrintDocument {
    /// Keeps the first `row_cap` rows; columns still come from the full row set.
    pub fn build(title: &str, rows: &[Row], row_cap: usize, at: OffsetDateTime) -> Self {
        Self {
            title: title.to_string(),
            generated: super::utils::generated_label(at),
            columns: collect_columns(rows),
            rows: rows.iter().take(row_cap).cloned().collect(),
            total_rows: rows.len(),
        }
    }

    pub fn omitted(&self) -> usize {
        self.total_rows - self.rows.len()
    }

    pub fn truncation_notice(&self) -> Option<String> {
        let omitted = self.omitted();
        (omitted > 0).then(|| {
            format!(
                "Showing the first {} of {} rows; {omitted} rows omitted. \
                 Use the CSV or Excel export for the full data.",
                self.rows.len(),
                self.total_rows
            )
        })
    }

    /// Cell texts of the kept rows, in column order.
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| display_cell(row, column))
                    .collect()
            })
            .collect()
    }

    /// Standalone page: the [`head_html`](Self::head_html) and
    /// [`body_html`](Self::body_html) fragments wrapped in a document.
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n{}</head>\n<body>\n{}</body>\n</html>\n",
            self.head_html(),
            self.body_html()
        )
    }

    /// Contents of `<head>`: charset, title and print stylesheet.
    pub fn head_html(&self) -> String {
        format!(
            "<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{PRINT_CSS}</style>\n",
            escape_html(&self.title)
        )
    }

    /// Contents of `<body>`: heading, meta line, truncation notice and the table.
    pub fn body_html(&self) -> String {
        let mut html = String::new();
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title)));
        html.push_str(&format!(
            "<p class=\"meta\">Generated {} · {} rows</p>\n",
            escape_html(&self.generated),
            self.total_rows
        ));
        if let Some(notice) = self.truncation_notice() {
            html.push_str(&format!("<p class=\"warning\">⚠ {}</p>\n", escape_html(&notice)));
        }
        html.push_str("<table>\n<thead>\n");
        html.push_str(&header_row(&self.columns));
        html.push_str("\n</thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str(&body_row(row, &self.columns));
            html.push('\n');
        }
        html.push_str("</tbody>\n</table>\n");
        html
    }
}

/// A way of turning a [`PrintDocument`] into something the user can keep.
pub trait PrintRenderer {
    fn render(&self, document: &PrintDocument) -> Result<ExportOutcome, ExportError>;
}

/// Something that can show the OS print dialog for an HTML page, given the
/// contents of its `<head>` and `<body>`.
pub trait PrintHost {
    fn print_page(&self, head: &str, body: &str) -> Result<(), ExportError>;
}

/// Delegates to the print dialog; saving as PDF happens there, not in the app.
pub struct PrintDialog<H> {
    host: H,
}

impl<H: PrintHost> PrintDialog<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }
}

impl<H: PrintHost> PrintRenderer for PrintDialog<H> {
    fn render(&self, document: &PrintDocument) -> Result<ExportOutcome, ExportError> {
        self.host.print_page(&document.head_html(), &document.body_html())?;
        tracing::info!(rows = document.rows.len(), "print dialog opened");
        Ok(ExportOutcome::PrintDialogOpened)
    }
}

/// Opens the page in a new browser window, prints it and closes the window again.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPrintHost;

#[cfg(target_arch = "wasm32")]
impl PrintHost for BrowserPrintHost {
    fn print_page(&self, head: &str, body: &str) -> Result<(), ExportError> {
        let failed = |what: &str| ExportError::Render(format!("print dialog: {what}"));

        let window = web_sys::window().ok_or_else(|| failed("window unavailable"))?;
        let popup = window
            .open_with_url_and_target("", "_blank")
            .map_err(|_| failed("unable to open print window"))?
            .ok_or_else(|| failed("print window blocked"))?;
        let document = popup
            .document()
            .ok_or_else(|| failed("print window has no document"))?;
        let (Some(page_head), Some(page_body)) = (document.head(), document.body()) else {
            let _ = popup.close();
            return Err(failed("print window has no head or body"));
        };
        page_head.set_inner_html(head);
        page_body.set_inner_html(body);

        // `print()` returns once the dialog is dismissed.
        let printed = popup.print().map_err(|_| failed("print call rejected"));
        if popup.close().is_err() {
            tracing::debug!("print window could not be closed");
        }
        printed
    }
}

/// Renders a PDF file locally and passes it to the sink for storage and sharing.
#[cfg(not(target_arch = "wasm32"))]
pub struct PdfFileRenderer<S> {
    sink: S,
}

#[cfg(not(target_arch = "wasm32"))]
impl<S: super::ArtifactSink> PdfFileRenderer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl<S: super::ArtifactSink> PrintRenderer for PdfFileRenderer<S> {
    fn render(&self, document: &PrintDocument) -> Result<ExportOutcome, ExportError> {
        let bytes = super::pdf::render_pdf(document)?;
        let artifact = super::Artifact {
            filename: super::utils::export_filename(&document.title, "pdf", super::utils::now()),
            mime: PDF_MIME,
            bytes,
        };
        let report = self.sink.deliver(&artifact, PDF_DIALOG_TITLE)?;
        Ok(ExportOutcome::Delivered(report))
    }
}

/// Picks the print strategy for `platform`.
pub fn renderer_for(
    platform: Platform,
    config: &ExportConfig,
) -> Result<Box<dyn PrintRenderer>, ExportError> {
    match platform.print_mode() {
        PrintMode::Dialog => dialog_renderer(),
        PrintMode::PdfFile => pdf_renderer(config),
    }
}

#[cfg(target_arch = "wasm32")]
fn dialog_renderer() -> Result<Box<dyn PrintRenderer>, ExportError> {
    Ok(Box::new(PrintDialog::new(BrowserPrintHost)))
}

#[cfg(not(target_arch = "wasm32"))]
fn dialog_renderer() -> Result<Box<dyn PrintRenderer>, ExportError> {
    Err(ExportError::Unsupported("print dialog"))
}

#[cfg(not(target_arch = "wasm32"))]
fn pdf_renderer(config: &ExportConfig) -> Result<Box<dyn PrintRenderer>, ExportError> {
    let sink = super::FileSink::for_platform(config)?;
    Ok(Box::new(PdfFileRenderer::new(sink)))
}

#[cfg(target_arch = "wasm32")]
fn pdf_renderer(_config: &ExportConfig) -> Result<Box<dyn PrintRenderer>, ExportError> {
    Err(ExportError::Unsupported("local PDF rendering"))
}
