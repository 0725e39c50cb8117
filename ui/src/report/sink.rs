//! Persisting export artifacts and handing them to the platform share mechanism.
//!
//! Storage and sharing are reported separately: once the bytes are on disk the export
//! has succeeded, whatever the share sheet does afterwards.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::ExportError;

/// Serialized report ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Where the artifact ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum SavedTo {
    /// The application-private export directory.
    Primary(PathBuf),
    /// A folder the user picked after the primary write failed.
    Picked(PathBuf),
    /// A browser download of the named file.
    Download(String),
}

impl SavedTo {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Primary(path) | Self::Picked(path) => Some(path),
            Self::Download(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShareOutcome {
    Shared,
    /// No share mechanism on this device; the file location is the result.
    Unavailable,
    /// The share call failed after the file was stored.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SinkReport {
    pub saved_to: SavedTo,
    pub share: ShareOutcome,
}

impl SinkReport {
    pub fn message(&self) -> String {
        match (&self.saved_to, &self.share) {
            (SavedTo::Download(name), _) => format!("Download of {name} started"),
            (saved, ShareOutcome::Shared) => format!("Saved to {} and shared", display(saved)),
            (saved, ShareOutcome::Unavailable) => format!("Saved to {}", display(saved)),
            (saved, ShareOutcome::Failed(_)) => {
                format!("Saved to {} (sharing unavailable)", display(saved))
            }
        }
    }
}

fn display(saved: &SavedTo) -> String {
    saved
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_default()
}

pub trait ArtifactSink {
    fn deliver(&self, artifact: &Artifact, dialog_title: &str) -> Result<SinkReport, ExportError>;
}

/// Asks the user for a writable folder. `None` means the request was declined.
pub trait FolderPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

pub trait ShareSheet {
    fn is_available(&self) -> bool;
    fn share(&self, path: &Path, mime: &str, dialog_title: &str) -> Result<(), String>;
}

/// Used where the platform offers no folder access prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFolderPicker;

impl FolderPicker for NoFolderPicker {
    fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _path: &Path, _mime: &str, _dialog_title: &str) -> Result<(), String> {
        Err("no share sheet on this platform".into())
    }
}

/// Native folder chooser.
#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogFolderPicker;

#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
impl FolderPicker for DialogFolderPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(title).pick_folder()
    }
}

/// Hands the file to the desktop's default handler.
#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShareSheet;

#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
impl ShareSheet for SystemShareSheet {
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, path: &Path, _mime: &str, _dialog_title: &str) -> Result<(), String> {
        opener::open(path).map_err(|err| err.to_string())
    }
}

/// Writes into the app's export directory, falling back to a user-picked folder.
pub struct FileSink {
    primary_dir: PathBuf,
    picker: Box<dyn FolderPicker>,
    share: Box<dyn ShareSheet>,
}

impl FileSink {
    pub fn new(
        primary_dir: impl Into<PathBuf>,
        picker: Box<dyn FolderPicker>,
        share: Box<dyn ShareSheet>,
    ) -> Self {
        Self {
            primary_dir: primary_dir.into(),
            picker,
            share,
        }
    }

    /// Sink wired to this platform's export directory, folder picker and share sheet.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn for_platform(config: &crate::core::config::ExportConfig) -> Result<Self, ExportError> {
        let dir = config.export_dir()?;

        #[cfg(not(any(target_os = "android", target_os = "ios")))]
        let sink = Self::new(dir, Box::new(DialogFolderPicker), Box::new(SystemShareSheet));

        // No picker on mobile: unless `export_root` points at app-private storage, a
        // rejected write ends as `PermissionDenied`.
        #[cfg(any(target_os = "android", target_os = "ios"))]
        let sink = Self::new(dir, Box::new(NoFolderPicker), Box::new(NoShareSheet));

        Ok(sink)
    }

    fn share_file(&self, path: &Path, mime: &str, dialog_title: &str) -> ShareOutcome {
        if !self.share.is_available() {
            return ShareOutcome::Unavailable;
        }
        match self.share.share(path, mime, dialog_title) {
            Ok(()) => ShareOutcome::Shared,
            Err(err) => {
                warn!(path = %path.display(), "share failed after export was saved: {err}");
                ShareOutcome::Failed(err)
            }
        }
    }
}

impl ArtifactSink for FileSink {
    fn deliver(&self, artifact: &Artifact, dialog_title: &str) -> Result<SinkReport, ExportError> {
        let saved_to = match write_file(&self.primary_dir, artifact) {
            Ok(path) => SavedTo::Primary(path),
            Err(err) => {
                warn!(
                    dir = %self.primary_dir.display(),
                    "export directory rejected the write ({err}); asking for a folder"
                );
                let folder = self
                    .picker
                    .pick_folder(dialog_title)
                    .ok_or(ExportError::PermissionDenied)?;
                let path = write_file(&folder, artifact).map_err(|source| ExportError::Storage {
                    path: folder.join(&artifact.filename),
                    source,
                })?;
                SavedTo::Picked(path)
            }
        };

        let share = match saved_to.path() {
            Some(path) => self.share_file(path, artifact.mime, dialog_title),
            None => ShareOutcome::Unavailable,
        };
        info!(file = %artifact.filename, bytes = artifact.bytes.len(), ?share, "export saved");

        Ok(SinkReport { saved_to, share })
    }
}

/// Writes through a `.partial` sibling so an interrupted write never leaves a
/// truncated file under the final name.
fn write_file(dir: &Path, artifact: &Artifact) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.filename);
    let partial = dir.join(format!("{}.partial", artifact.filename));

    let written = fs::write(&partial, &artifact.bytes).and_then(|_| fs::rename(&partial, &path));
    if let Err(err) = written {
        let _ = fs::remove_file(&partial);
        return Err(err);
    }
    Ok(path)
}

/// Browser download through a temporary object URL.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserDownload;

#[cfg(target_arch = "wasm32")]
impl ArtifactSink for BrowserDownload {
    fn deliver(&self, artifact: &Artifact, _dialog_title: &str) -> Result<SinkReport, ExportError> {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let unavailable = |what: &str| ExportError::Render(format!("browser download: {what}"));

        let array = js_sys::Uint8Array::from(artifact.bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(artifact.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| unavailable("failed to create blob"))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| unavailable("unable to create object URL"))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| unavailable("document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| unavailable("unable to create anchor"))?
            .dyn_into()
            .map_err(|_| unavailable("anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(&artifact.filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| unavailable("missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(SinkReport {
            saved_to: SavedTo::Download(artifact.filename.clone()),
            share: ShareOutcome::Unavailable,
        })
    }
}
