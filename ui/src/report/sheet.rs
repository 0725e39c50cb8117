//! Spreadsheet-compatible HTML.
//!
//! Spreadsheet programs open a plain HTML table saved with an `.xls` extension, which
//! keeps binary workbook writers out of the dependency tree.

use crate::core::row::{collect_columns, display_cell, Row};

/// Escapes the five characters that can break out of HTML text or attribute content.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// `<tr>` of `<th>` cells for the given columns.
pub(crate) fn header_row(columns: &[String]) -> String {
    let cells: String = columns
        .iter()
        .map(|column| format!("<th>{}</th>", escape_html(column)))
        .collect();
    format!("<tr>{cells}</tr>")
}

/// `<tr>` of `<td>` cells, one per column, empty where the row lacks the field.
pub(crate) fn body_row(row: &Row, columns: &[String]) -> String {
    let cells: String = columns
        .iter()
        .map(|column| format!("<td>{}</td>", escape_html(&display_cell(row, column))))
        .collect();
    format!("<tr>{cells}</tr>")
}

/// A self-contained HTML document holding one table: a header row plus one row per record.
pub fn to_spreadsheet_html(rows: &[Row], sheet_title: &str) -> String {
    let columns = collect_columns(rows);
    let title = escape_html(sheet_title);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:x=\"urn:schemas-microsoft-com:office:excel\">\n",
    );
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str("<table border=\"1\">\n");
    html.push_str("<thead>\n");
    html.push_str(&header_row(&columns));
    html.push_str("\n</thead>\n<tbody>\n");
    for row in rows {
        html.push_str(&body_row(row, &columns));
        html.push('\n');
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}
