use time::{macros::format_description, OffsetDateTime};

use crate::core::districts::slug;

/// Export timestamps are UTC; the local offset is not readable once the runtime has
/// spawned threads.
pub(crate) fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// `YYYY-MM-DD_HHMMSS`
pub fn timestamp_slug(at: OffsetDateTime) -> String {
    at.format(&format_description!(
        "[year]-[month]-[day]_[hour][minute][second]"
    ))
    .unwrap_or_else(|_| "export".into())
}

/// Human-readable timestamp printed on generated documents, e.g. `07-03-2024 09:05 UTC`.
pub(crate) fn generated_label(at: OffsetDateTime) -> String {
    let at = at.to_offset(time::UtcOffset::UTC);
    at.format(&format_description!("[day]-[month]-[year] [hour]:[minute] UTC"))
        .unwrap_or_default()
}

/// Filesystem-safe `<Title_Words>_<timestamp>.<extension>`.
pub fn export_filename(title: &str, extension: &str, at: OffsetDateTime) -> String {
    let base: Vec<String> = slug(title)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();
    let base = if base.is_empty() {
        "Report".to_string()
    } else {
        base.join("_")
    };
    format!("{base}_{}.{extension}", timestamp_slug(at))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamp_is_zero_padded() {
        let at = datetime!(2024-03-07 09:05:04 UTC);
        assert_eq!(timestamp_slug(at), "2024-03-07_090504");
    }

    #[test]
    fn filename_joins_title_and_timestamp() {
        let at = datetime!(2024-11-30 23:59:01 UTC);
        assert_eq!(
            export_filename("District DCB report", "csv", at),
            "District_Dcb_Report_2024-11-30_235901.csv"
        );
        assert_eq!(
            export_filename("Inspector/District: totals?", "xls", at),
            "Inspector_District_Totals_2024-11-30_235901.xls"
        );
    }

    #[test]
    fn generated_label_names_utc() {
        let at = datetime!(2024-03-07 09:05:04 UTC);
        assert_eq!(generated_label(at), "07-03-2024 09:05 UTC");

        let shifted = datetime!(2024-03-07 14:35:04 +05:30);
        assert_eq!(generated_label(shifted), "07-03-2024 09:05 UTC");
    }

    #[test]
    fn now_is_utc() {
        assert_eq!(now().offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn blank_title_falls_back_to_report() {
        let at = datetime!(2024-01-01 00:00:00 UTC);
        assert_eq!(export_filename("  ", "pdf", at), "Report_2024-01-01_000000.pdf");
    }
}
