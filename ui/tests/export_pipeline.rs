//! End-to-end checks of the report pipeline: grouping, serializers and file delivery.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use ui::core::row::{rows_from_value, Row};
use ui::report::csv::to_csv;
use ui::report::sheet::to_spreadsheet_html;
use ui::report::sink::{FolderPicker, NoShareSheet};
use ui::report::{
    Aggregation, ArtifactSink, ExportContext, ExportFormat, ExportJob, ExportOutcome, FileSink,
    GroupKey, MissingKey, PrintDocument, PrintRenderer, SavedTo, ShareOutcome,
};

fn rows(value: Value) -> Vec<Row> {
    rows_from_value(value).expect("rows must be an array of objects")
}

struct PickedFolder(PathBuf);

impl FolderPicker for PickedFolder {
    fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// A path under `root` that cannot become a directory.
fn unwritable_dir(root: &Path) -> PathBuf {
    let blocker = root.join("blocker");
    fs::write(&blocker, b"file, not a folder").unwrap();
    blocker.join("exports")
}

#[test]
fn grouping_sums_mixed_numeric_values() {
    let input = rows(json!([
        {"name": "A", "amt": 100},
        {"name": "B", "amt": "200"},
        {"name": "A", "amt": 50}
    ]));

    let records = Aggregation::by(GroupKey::field("name")).sum("amt").run(&input);

    let summary: Vec<(String, f64)> = records
        .iter()
        .map(|record| (record.key.clone(), record.total("amt")))
        .collect();
    assert_eq!(summary, vec![("A".to_string(), 150.0), ("B".to_string(), 200.0)]);
}

#[test]
fn missing_keys_are_skipped_unless_bucketed() {
    let input = rows(json!([
        {"name": "A", "amt": 1},
        {"name": null, "amt": 2},
        {"amt": 3}
    ]));

    let skipped = Aggregation::by(GroupKey::field("name")).sum("amt").run(&input);
    assert_eq!(skipped.len(), 1);

    let bucketed = Aggregation::by(GroupKey::field("name"))
        .sum("amt")
        .missing_key(MissingKey::Bucket("Unknown".into()))
        .run(&input);
    assert_eq!(bucketed[1].key, "Unknown");
    assert_eq!(bucketed[1].total("amt"), 5.0);
}

#[test]
fn csv_quotes_embedded_quotes_and_commas() {
    let csv = to_csv(&rows(json!([{"note": "He said \"hi\", then left"}])));
    let body = csv.trim_start_matches('\u{feff}');
    assert_eq!(body, "note\r\n\"He said \"\"hi\"\", then left\"");
}

#[test]
fn empty_spreadsheet_is_well_formed() {
    let html = to_spreadsheet_html(&[], "Nothing yet");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<table"));
    assert!(html.contains("<tbody>\n</tbody>"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn picker_location_wins_when_primary_write_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let intended = unwritable_dir(tmp.path());
    let picked = tmp.path().join("picked");
    let sink = FileSink::new(
        &intended,
        Box::new(PickedFolder(picked.clone())),
        Box::new(NoShareSheet),
    );

    struct NoPrinter;
    impl PrintRenderer for NoPrinter {
        fn render(
            &self,
            _document: &PrintDocument,
        ) -> Result<ExportOutcome, ui::report::ExportError> {
            Ok(ExportOutcome::PrintDialogOpened)
        }
    }
    let context = ExportContext::new(Default::default(), Box::new(sink), Box::new(NoPrinter));

    let outcome = ExportJob::new(ExportFormat::Csv, "Collections", rows(json!([{"a": 1}])))
        .run(&context)
        .unwrap();

    let ExportOutcome::Delivered(report) = outcome else {
        panic!("csv export must be delivered through the sink");
    };
    let SavedTo::Picked(path) = &report.saved_to else {
        panic!("expected the picked folder, got {:?}", report.saved_to);
    };
    assert!(path.starts_with(&picked));
    assert!(!path.starts_with(&intended));
    assert!(fs::read_to_string(path).unwrap().ends_with("a\r\n1"));
    assert_eq!(report.share, ShareOutcome::Unavailable);
}

#[test]
fn pdf_export_is_written_and_named_with_a_timestamp() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = FileSink::new(
        tmp.path(),
        Box::new(ui::report::sink::NoFolderPicker),
        Box::new(NoShareSheet),
    );
    let printer = ui::report::print::PdfFileRenderer::new(FileSink::new(
        tmp.path(),
        Box::new(ui::report::sink::NoFolderPicker),
        Box::new(NoShareSheet),
    ));
    let context = ExportContext::new(Default::default(), Box::new(sink), Box::new(printer));

    let input = rows(json!([
        {"district": "Kurnool", "demand_total": 1200, "collection_total": 800},
        {"district": "Guntur", "demand_total": 900, "collection_total": 900}
    ]));
    let outcome = ExportJob::new(ExportFormat::Pdf, "District DCB report", input)
        .run(&context)
        .unwrap();

    let ExportOutcome::Delivered(report) = outcome else {
        panic!("native pdf export must produce a file");
    };
    let path = report.saved_to.path().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("District_Dcb_Report_"));
    assert!(name.ends_with(".pdf"));
    // `_YYYY-MM-DD_HHMMSS.pdf`
    let stamp = &name["District_Dcb_Report_".len()..name.len() - ".pdf".len()];
    assert_eq!(stamp.len(), 17);
    assert_eq!(&stamp[10..11], "_");
    assert!(fs::read(path).unwrap().starts_with(b"%PDF"));
}

#[test]
fn sink_trait_object_is_usable_directly() {
    let tmp = tempfile::tempdir().unwrap();
    let sink: Box<dyn ArtifactSink> = Box::new(FileSink::new(
        tmp.path(),
        Box::new(ui::report::sink::NoFolderPicker),
        Box::new(NoShareSheet),
    ));
    let artifact = ui::report::Artifact {
        filename: "Summary_2024-01-01_000000.xls".into(),
        mime: ExportFormat::ExcelHtml.mime(),
        bytes: to_spreadsheet_html(&[], "Summary").into_bytes(),
    };

    let report = sink.deliver(&artifact, "Export report").unwrap();
    assert_eq!(report.saved_to, SavedTo::Primary(tmp.path().join("Summary_2024-01-01_000000.xls")));
    assert!(report.message().starts_with("Saved to "));
}
