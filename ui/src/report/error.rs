use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures an export can surface to the caller.
///
/// Share failures are deliberately absent: once the artifact is stored the export has
/// succeeded, and the share result travels in [`super::ShareOutcome`] instead.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write access to a destination folder was not granted")]
    PermissionDenied,
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),
    #[error("unable to determine export directory")]
    NoExportDir,
    #[error("invalid export configuration: {0}")]
    Config(#[from] serde_json::Error),
}
