//! Local snapshot of collection rows that the report screens read from.

use thiserror::Error;

use super::config::ExportConfig;
use super::row::{rows_from_value, Row};

#[cfg(target_arch = "wasm32")]
const SNAPSHOT_KEY: &str = "waqf.snapshot";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot storage is unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot must be a JSON array of objects")]
    Malformed,
}

/// Parses a snapshot document into rows.
pub fn parse_rows(raw: &str) -> Result<Vec<Row>, StorageError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(raw)?;
    rows_from_value(value).ok_or(StorageError::Malformed)
}

/// Loads the most recent snapshot; an absent snapshot yields no rows.
pub fn load_rows(config: &ExportConfig) -> Result<Vec<Row>, StorageError> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = config;
        let storage = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))?;
        let raw = storage
            .get_item(SNAPSHOT_KEY)
            .map_err(|_| StorageError::Unavailable("localStorage read".into()))?;
        match raw {
            Some(raw) => parse_rows(&raw),
            None => Ok(Vec::new()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let dirs = config
            .project_dirs()
            .ok_or_else(|| StorageError::Unavailable("project directories".into()))?;
        let path = dirs.data_dir().join("snapshot.json");
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let rows = parse_rows(&raw)?;
                tracing::info!(rows = rows.len(), path = %path.display(), "loaded row snapshot");
                Ok(rows)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_snapshot_has_no_rows() {
        assert!(parse_rows("  ").unwrap().is_empty());
        assert!(parse_rows("[]").unwrap().is_empty());
    }

    #[test]
    fn snapshot_rows_keep_field_order() {
        let rows = parse_rows(r#"[{"z": 1, "a": 2}]"#).unwrap();
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn scalar_entries_are_malformed() {
        assert!(matches!(parse_rows("[1, 2]"), Err(StorageError::Malformed)));
        assert!(matches!(parse_rows("{"), Err(StorageError::Parse(_))));
    }
}
