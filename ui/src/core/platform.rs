//! Platform detection helpers.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Web,
    Desktop,
    Mobile,
}

/// How printable reports leave the app on a given platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Hand the HTML to the host's print dialog; the user saves the PDF from there.
    Dialog,
    /// Render a PDF file locally, then share it.
    PdfFile,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Web
        } else if cfg!(any(target_os = "android", target_os = "ios")) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn print_mode(self) -> PrintMode {
        match self {
            Self::Web => PrintMode::Dialog,
            Self::Desktop | Self::Mobile => PrintMode::PdfFile,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_web_uses_the_print_dialog() {
        assert_eq!(Platform::Web.print_mode(), PrintMode::Dialog);
        assert_eq!(Platform::Desktop.print_mode(), PrintMode::PdfFile);
        assert_eq!(Platform::Mobile.print_mode(), PrintMode::PdfFile);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_builds_are_not_web() {
        assert_ne!(Platform::current(), Platform::Web);
    }
}
