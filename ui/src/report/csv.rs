use crate::core::row::{collect_columns, display_cell, Row};

/// UTF-8 byte-order mark; spreadsheet programs use it to detect the encoding.
pub const BOM: &str = "\u{feff}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub bom: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { bom: true }
    }
}

/// CSV text with a BOM, a header built from every key in `rows`, and CRLF line breaks.
pub fn to_csv(rows: &[Row]) -> String {
    to_csv_with(rows, CsvOptions::default())
}

pub fn to_csv_with(rows: &[Row], options: CsvOptions) -> String {
    let mut csv = String::new();
    if options.bom {
        csv.push_str(BOM);
    }

    let columns = collect_columns(rows);
    if columns.is_empty() {
        return csv;
    }

    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|column| escape_csv(column))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let line = columns
            .iter()
            .map(|column| escape_csv(&display_cell(row, column)))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    csv.push_str(&lines.join("\r\n"));
    csv
}

/// Quotes a cell containing a comma, quote or line break, doubling inner quotes.
pub fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes = value.contains([',', '"', '\n', '\r']);
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
