//! Local PDF rendering for platforms without a print dialog.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::print::PrintDocument;
use super::ExportError;

const CELL_FONT_PT: f32 = 7.5;
const TITLE_FONT_PT: f32 = 14.0;
const META_FONT_PT: f32 = 8.0;
const ELLIPSIS: &str = "...";

/// Landscape A4 by default; every measurement is in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub row_height: f32,
    pub title_block: f32,
    pub notice_height: f32,
    /// Average glyph advance at the cell font size.
    pub char_width: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 297.0,
            height: 210.0,
            margin: 12.0,
            row_height: 5.5,
            title_block: 14.0,
            notice_height: 7.0,
            char_width: 1.45,
        }
    }
}

impl PageGeometry {
    fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Body rows that fit below the column header, after `reserved` millimetres.
    fn rows_fitting(&self, reserved: f32) -> usize {
        let free = self.usable_height() - reserved - self.row_height;
        ((free / self.row_height).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub number: usize,
    /// Title and generation line; first page only.
    pub heading: bool,
    pub notice: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Splits the document into pages, clipping cell text to its column width.
pub fn layout_pages(document: &PrintDocument, geometry: &PageGeometry) -> Vec<PageLayout> {
    let column_count = document.columns.len().max(1);
    let column_width = geometry.usable_width() / column_count as f32;
    let max_chars = ((column_width / geometry.char_width).floor() as usize).max(ELLIPSIS.len() + 1);

    let header: Vec<String> = document
        .columns
        .iter()
        .map(|column| truncate_cell(column, max_chars))
        .collect();
    let mut remaining: Vec<Vec<String>> = document
        .cells()
        .into_iter()
        .map(|cells| cells.iter().map(|cell| truncate_cell(cell, max_chars)).collect())
        .collect();

    let notice = document.truncation_notice();
    let notice_height = notice.as_ref().map_or(0.0, |_| geometry.notice_height);
    let first_reserved = geometry.title_block + notice_height;
    let first_capacity = geometry.rows_fitting(first_reserved);
    let later_capacity = geometry.rows_fitting(0.0);

    let mut pages = Vec::new();
    let first_rows: Vec<Vec<String>> = remaining
        .drain(..first_capacity.min(remaining.len()))
        .collect();
    pages.push(PageLayout {
        number: 1,
        heading: true,
        notice,
        header: header.clone(),
        rows: first_rows,
    });

    while !remaining.is_empty() {
        let rows: Vec<Vec<String>> = remaining
            .drain(..later_capacity.min(remaining.len()))
            .collect();
        pages.push(PageLayout {
            number: pages.len() + 1,
            heading: false,
            notice: None,
            header: header.clone(),
            rows,
        });
    }
    pages
}

/// Clips `text` to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_cell(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut clipped: String = text.chars().take(keep).collect();
    clipped.push_str(ELLIPSIS);
    clipped
}

/// The built-in PDF fonts only cover Latin-1; anything else prints as `?`,
/// except the rupee sign which is spelled out.
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '₹' => out.push_str("Rs."),
            '·' => out.push('-'),
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// PDF bytes for `document` on landscape A4 pages.
pub fn render_pdf(document: &PrintDocument) -> Result<Vec<u8>, ExportError> {
    render_pdf_with(document, &PageGeometry::default())
}

pub fn render_pdf_with(
    document: &PrintDocument,
    geometry: &PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    let failed = |err: printpdf::Error| ExportError::Render(format!("pdf: {err}"));

    let pages = layout_pages(document, geometry);
    let page_count = pages.len();
    let (doc, first_page, first_layer) = PdfDocument::new(
        pdf_text(&document.title),
        Mm(geometry.width),
        Mm(geometry.height),
        "page 1",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(failed)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(failed)?;
    let fonts = Fonts { regular, bold };

    for page in &pages {
        let layer = if page.number == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (index, layer) = doc.add_page(
                Mm(geometry.width),
                Mm(geometry.height),
                format!("page {}", page.number),
            );
            doc.get_page(index).get_layer(layer)
        };
        draw_page(&layer, page, page_count, document, geometry, &fonts);
    }

    let bytes = doc.save_to_bytes().map_err(failed)?;
    tracing::debug!(pages = page_count, bytes = bytes.len(), "pdf rendered");
    Ok(bytes)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &PageLayout,
    page_count: usize,
    document: &PrintDocument,
    geometry: &PageGeometry,
    fonts: &Fonts,
) {
    let left = geometry.margin;
    // PDF y grows upwards from the bottom edge.
    let mut y = geometry.height - geometry.margin;

    if page.heading {
        y -= 5.0;
        layer.use_text(pdf_text(&document.title), TITLE_FONT_PT, Mm(left), Mm(y), &fonts.bold);
        y -= 5.0;
        let meta = format!("Generated {} - {} rows", document.generated, document.total_rows);
        layer.use_text(pdf_text(&meta), META_FONT_PT, Mm(left), Mm(y), &fonts.regular);
        y = geometry.height - geometry.margin - geometry.title_block;
    }
    if let Some(notice) = &page.notice {
        layer.use_text(pdf_text(notice), META_FONT_PT, Mm(left), Mm(y - 4.0), &fonts.bold);
        y -= geometry.notice_height;
    }

    let column_width = geometry.usable_width() / page.header.len().max(1) as f32;
    y -= geometry.row_height;
    draw_cells(layer, &page.header, left, y, column_width, &fonts.bold);
    for row in &page.rows {
        y -= geometry.row_height;
        draw_cells(layer, row, left, y, column_width, &fonts.regular);
    }

    let footer = format!("Page {} of {page_count}", page.number);
    layer.use_text(footer, META_FONT_PT, Mm(left), Mm(geometry.margin / 2.0), &fonts.regular);
}

fn draw_cells(
    layer: &PdfLayerReference,
    cells: &[String],
    left: f32,
    y: f32,
    column_width: f32,
    font: &IndirectFontRef,
) {
    for (index, cell) in cells.iter().enumerate() {
        let x = left + column_width * index as f32;
        layer.use_text(pdf_text(cell), CELL_FONT_PT, Mm(x), Mm(y), font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::row::{rows_from_value, Row};
    use serde_json::json;
    use time::macros::datetime;

    fn document(count: usize, cap: usize) -> PrintDocument {
        let rows: Vec<Row> = (0..count)
            .map(|index| {
                json!({
                    "district": "Guntur",
                    "institution": format!("Masjid {index}"),
                    "amount": index
                })
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();
        PrintDocument::build("District DCB", &rows, cap, datetime!(2024-05-01 10:00 UTC))
    }

    #[test]
    fn long_cells_are_clipped_with_ellipsis() {
        assert_eq!(truncate_cell("short", 10), "short");
        assert_eq!(truncate_cell("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn rows_flow_onto_following_pages() {
        let geometry = PageGeometry::default();
        let pages = layout_pages(&document(120, 300), &geometry);

        assert!(pages.len() > 1);
        assert!(pages[0].heading);
        assert!(pages.iter().skip(1).all(|page| !page.heading));
        let total: usize = pages.iter().map(|page| page.rows.len()).sum();
        assert_eq!(total, 120);
        assert!(pages.iter().all(|page| page.header.len() == 3));
    }

    #[test]
    fn notice_sits_on_the_first_page_only() {
        let pages = layout_pages(&document(320, 300), &PageGeometry::default());
        assert!(pages[0].notice.as_deref().unwrap().contains("20 rows omitted"));
        assert!(pages.iter().skip(1).all(|page| page.notice.is_none()));
        let total: usize = pages.iter().map(|page| page.rows.len()).sum();
        assert_eq!(total, 300);
    }

    #[test]
    fn empty_document_is_one_page() {
        let rows = rows_from_value(json!([])).unwrap();
        let document = PrintDocument::build("Empty", &rows, 300, datetime!(2024-05-01 10:00 UTC));
        let pages = layout_pages(&document, &PageGeometry::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].rows.is_empty());
    }

    #[test]
    fn rupee_sign_is_spelled_out() {
        assert_eq!(pdf_text("₹1,00,000"), "Rs.1,00,000");
        assert_eq!(pdf_text("Zoë"), "Zoë");
        assert_eq!(pdf_text("వక్ఫ్"), "?????");
    }

    #[test]
    fn renders_pdf_bytes() {
        let bytes = render_pdf(&document(40, 300)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    /// Text shown by `Tj`/`TJ` operators on each page, in page order.
    fn page_texts(bytes: &[u8]) -> Vec<String> {
        use printpdf::lopdf::content::Content;
        use printpdf::lopdf::{Document, Object};

        fn push_strings(object: &Object, out: &mut String) {
            match object {
                Object::String(bytes, _) => out.extend(bytes.iter().map(|byte| *byte as char)),
                Object::Array(items) => items.iter().for_each(|item| push_strings(item, out)),
                _ => {}
            }
        }

        let pdf = Document::load_mem(bytes).unwrap();
        pdf.get_pages()
            .values()
            .map(|page| {
                let content = Content::decode(&pdf.get_page_content(*page).unwrap()).unwrap();
                let mut text = String::new();
                for operation in content.operations {
                    if operation.operator == "Tj" || operation.operator == "TJ" {
                        operation
                            .operands
                            .iter()
                            .for_each(|operand| push_strings(operand, &mut text));
                        text.push('\n');
                    }
                }
                text
            })
            .collect()
    }

    #[test]
    fn truncation_notice_is_printed_on_the_first_page() {
        let bytes = render_pdf(&document(320, 300)).unwrap();
        let pages = page_texts(&bytes);

        assert!(pages.len() > 1);
        assert!(pages[0].contains("20 rows omitted"));
        assert!(pages[0].contains("District DCB"));
        assert!(pages[0].contains("Masjid 0"));
        assert!(pages.iter().skip(1).all(|page| !page.contains("rows omitted")));
        assert!(pages.iter().any(|page| page.contains("Masjid 299")));
        assert!(pages.iter().all(|page| !page.contains("Masjid 300")));
    }
}
