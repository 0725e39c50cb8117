//! Export settings, constructed once by the platform shell and handed to the views via context.

use serde::{Deserialize, Serialize};

use crate::report::ExportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Reverse-domain qualifier used to resolve the project directories.
    pub qualifier: String,
    pub organization: String,
    pub application: String,
    /// Folder under the data directory that receives exported files.
    pub export_subdir: String,
    /// Replaces the project data directory as the parent of `export_subdir`. Mobile
    /// builds need this: `ProjectDirs` does not resolve to app-private storage there.
    pub export_root: Option<std::path::PathBuf>,
    /// Rows rendered into printable/PDF output before the rest is summarised.
    pub pdf_row_cap: usize,
    /// Prefix CSV output with a UTF-8 byte-order mark.
    pub csv_bom: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            qualifier: "org".into(),
            organization: "Waqf Board".into(),
            application: "Waqf Collections".into(),
            export_subdir: "exports".into(),
            export_root: None,
            pdf_row_cap: 300,
            csv_bom: true,
        }
    }
}

impl ExportConfig {
    pub fn from_json(raw: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads `export.json` from the config directory, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let defaults = Self::default();
            let Some(dirs) = defaults.project_dirs() else {
                return defaults;
            };
            let path = dirs.config_dir().join("export.json");
            match std::fs::read_to_string(&path) {
                Ok(raw) => match Self::from_json(&raw) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded export config");
                        config
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), "ignoring export config: {err}");
                        defaults
                    }
                },
                Err(_) => defaults,
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            Self::default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn project_dirs(&self) -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from(&self.qualifier, &self.organization, &self.application)
    }

    /// Application-private directory that exports are written to first.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_dir(&self) -> Result<std::path::PathBuf, ExportError> {
        if let Some(root) = &self.export_root {
            return Ok(root.join(&self.export_subdir));
        }
        let dirs = self.project_dirs().ok_or(ExportError::NoExportDir)?;
        Ok(dirs.data_dir().join(&self.export_subdir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ExportConfig::from_json(r#"{ "pdf_row_cap": 50 }"#).unwrap();
        assert_eq!(config.pdf_row_cap, 50);
        assert!(config.csv_bom);
        assert_eq!(config.export_subdir, "exports");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn export_root_overrides_the_project_data_dir() {
        let config =
            ExportConfig::from_json(r#"{ "export_root": "/data/user/0/org.waqf/files" }"#)
                .unwrap();
        assert_eq!(
            config.export_dir().unwrap(),
            std::path::Path::new("/data/user/0/org.waqf/files").join("exports")
        );
        assert_eq!(ExportConfig::default().export_root, None);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ExportConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }
}
