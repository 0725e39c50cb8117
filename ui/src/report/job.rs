use super::csv::{to_csv_with, CsvOptions};
use super::print::{renderer_for, PrintDocument, PrintRenderer};
use super::sheet::to_spreadsheet_html;
use super::sink::{Artifact, ArtifactSink, SinkReport};
use super::utils::{export_filename, now};
use super::ExportError;
use crate::core::config::ExportConfig;
use crate::core::platform::Platform;
use crate::core::row::Row;

pub const SHARE_DIALOG_TITLE: &str = "Export report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    ExcelHtml,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Csv, Self::ExcelHtml, Self::Pdf];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::ExcelHtml => "xls",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::ExcelHtml => "application/vnd.ms-excel",
            Self::Pdf => super::print::PDF_MIME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::ExcelHtml => "Excel",
            Self::Pdf => "PDF",
        }
    }
}

/// What the user sees once an export finished.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Delivered(SinkReport),
    /// The browser print dialog took over; any saved file is outside the app's reach.
    PrintDialogOpened,
}

impl ExportOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Delivered(report) => report.message(),
            Self::PrintDialogOpened => "Print dialog opened".to_string(),
        }
    }
}

/// Everything an export needs from its surroundings.
pub struct ExportContext {
    pub config: ExportConfig,
    pub sink: Box<dyn ArtifactSink>,
    pub printer: Box<dyn PrintRenderer>,
}

impl ExportContext {
    pub fn new(
        config: ExportConfig,
        sink: Box<dyn ArtifactSink>,
        printer: Box<dyn PrintRenderer>,
    ) -> Self {
        Self { config, sink, printer }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_platform(config: ExportConfig) -> Result<Self, ExportError> {
        let sink = super::sink::FileSink::for_platform(&config)?;
        let printer = renderer_for(Platform::current(), &config)?;
        Ok(Self::new(config, Box::new(sink), printer))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn for_platform(config: ExportConfig) -> Result<Self, ExportError> {
        let printer = renderer_for(Platform::current(), &config)?;
        Ok(Self::new(config, Box::new(super::sink::BrowserDownload), printer))
    }
}

/// One user-requested export. Consumed by [`ExportJob::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub format: ExportFormat,
    pub title: String,
    pub rows: Vec<Row>,
}

impl ExportJob {
    pub fn new(format: ExportFormat, title: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            format,
            title: title.into(),
            rows,
        }
    }

    pub fn run(self, context: &ExportContext) -> Result<ExportOutcome, ExportError> {
        tracing::info!(
            format = self.format.label(),
            rows = self.rows.len(),
            title = %self.title,
            "export started"
        );

        let bytes = match self.format {
            ExportFormat::Pdf => {
                let cap = context.config.pdf_row_cap;
                let document = PrintDocument::build(&self.title, &self.rows, cap, now());
                return context.printer.render(&document);
            }
            ExportFormat::Csv => to_csv_with(
                &self.rows,
                CsvOptions {
                    bom: context.config.csv_bom,
                },
            )
            .into_bytes(),
            ExportFormat::ExcelHtml => to_spreadsheet_html(&self.rows, &self.title).into_bytes(),
        };

        let artifact = Artifact {
            filename: export_filename(&self.title, self.format.extension(), now()),
            mime: self.format.mime(),
            bytes,
        };
        let report = context.sink.deliver(&artifact, SHARE_DIALOG_TITLE)?;
        Ok(ExportOutcome::Delivered(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sink::{SavedTo, ShareOutcome};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemorySink(Rc<RefCell<Vec<(Artifact, String)>>>);

    impl ArtifactSink for MemorySink {
        fn deliver(
            &self,
            artifact: &Artifact,
            dialog_title: &str,
        ) -> Result<SinkReport, ExportError> {
            self.0.borrow_mut().push((artifact.clone(), dialog_title.to_string()));
            Ok(SinkReport {
                saved_to: SavedTo::Download(artifact.filename.clone()),
                share: ShareOutcome::Unavailable,
            })
        }
    }

    #[derive(Clone, Default)]
    struct CountingPrinter(Rc<RefCell<Vec<usize>>>);

    impl PrintRenderer for CountingPrinter {
        fn render(&self, document: &PrintDocument) -> Result<ExportOutcome, ExportError> {
            self.0.borrow_mut().push(document.rows.len());
            Ok(ExportOutcome::PrintDialogOpened)
        }
    }

    fn context(sink: &MemorySink, printer: &CountingPrinter) -> ExportContext {
        ExportContext::new(
            ExportConfig {
                pdf_row_cap: 2,
                ..ExportConfig::default()
            },
            Box::new(sink.clone()),
            Box::new(printer.clone()),
        )
    }

    fn rows() -> Vec<Row> {
        crate::core::row::rows_from_value(json!([
            {"district": "Guntur", "amount": 1},
            {"district": "Krishna", "amount": 2},
            {"district": "Kurnool", "amount": 3}
        ]))
        .unwrap()
    }

    #[test]
    fn formats_know_their_files() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::ExcelHtml.extension(), "xls");
        assert_eq!(ExportFormat::ExcelHtml.mime(), "application/vnd.ms-excel");
        assert_eq!(ExportFormat::Pdf.mime(), "application/pdf");
    }

    #[test]
    fn every_format_is_offered_once() {
        assert_eq!(
            ExportFormat::ALL,
            [ExportFormat::Csv, ExportFormat::ExcelHtml, ExportFormat::Pdf]
        );
        let labels: Vec<&str> = ExportFormat::ALL.iter().map(|format| format.label()).collect();
        assert_eq!(labels, ["CSV", "Excel", "PDF"]);
    }

    #[test]
    fn csv_goes_to_the_sink_with_the_report_dialog_title() {
        let sink = MemorySink::default();
        let printer = CountingPrinter::default();

        let outcome = ExportJob::new(ExportFormat::Csv, "District DCB", rows())
            .run(&context(&sink, &printer))
            .unwrap();

        assert!(matches!(outcome, ExportOutcome::Delivered(_)));
        let delivered = sink.0.borrow();
        let (artifact, title) = &delivered[0];
        assert_eq!(title, SHARE_DIALOG_TITLE);
        assert_eq!(artifact.mime, "text/csv");
        assert!(artifact.filename.starts_with("District_Dcb_"));
        assert!(artifact.filename.ends_with(".csv"));
        assert!(artifact.bytes.starts_with("\u{feff}district,amount".as_bytes()));
        assert!(printer.0.borrow().is_empty());
    }

    #[test]
    fn excel_export_is_html() {
        let sink = MemorySink::default();
        let printer = CountingPrinter::default();

        ExportJob::new(ExportFormat::ExcelHtml, "Inspectors", rows())
            .run(&context(&sink, &printer))
            .unwrap();

        let delivered = sink.0.borrow();
        let text = String::from_utf8(delivered[0].0.bytes.clone()).unwrap();
        assert!(text.contains("<td>Kurnool</td>"));
        assert!(delivered[0].0.filename.ends_with(".xls"));
    }

    #[test]
    fn pdf_goes_through_the_printer_with_the_row_cap() {
        let sink = MemorySink::default();
        let printer = CountingPrinter::default();

        let outcome = ExportJob::new(ExportFormat::Pdf, "Print", rows())
            .run(&context(&sink, &printer))
            .unwrap();

        assert_eq!(outcome, ExportOutcome::PrintDialogOpened);
        assert_eq!(*printer.0.borrow(), vec![2]);
        assert!(sink.0.borrow().is_empty());
    }
}
