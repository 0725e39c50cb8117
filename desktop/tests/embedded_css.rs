#![cfg(test)]
//! The desktop window has no asset directory; the shared theme is compiled in through
//! `ui::THEME_CSS`. A broken path or truncated file would only show up as an unstyled
//! window, so check it here.

#[test]
fn embedded_theme_is_the_shared_file() {
    let on_disk = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../ui/assets/theme/main.css"));
    assert_eq!(ui::THEME_CSS, on_disk);
}

#[test]
fn embedded_css_contains_expected_tokens() {
    let required = ["--color-bg", "body {", ".button--primary", ".report-card"];
    for token in required {
        assert!(
            ui::THEME_CSS.contains(token),
            "Expected token `{token}` missing from embedded CSS"
        );
    }
}
