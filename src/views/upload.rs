//! Upload view
//!
//! Holds the draft (selected file, local preview, caption) until it is
//! submitted or discarded. Selection is validated locally: only image or
//! video files of at most 50 MB are accepted, and nothing touches the
//! network until `submit`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::api::{ApiError, Post, UploadRequest};
use crate::router::Route;
use crate::session::SessionStore;

/// Largest accepted file, in bytes (50 MB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Errors from selecting or submitting an upload
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Please select an image or video file")]
    UnsupportedType(String),

    #[error("File size must be less than 50MB")]
    TooLarge(u64),

    #[error("Please select a file")]
    NoFile,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload failed: {0}")]
    Api(#[from] ApiError),
}

/// Broad media category of a selected file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Check MIME type and size of a candidate file
pub fn validate_selection(mime_type: &str, size: u64) -> Result<MediaKind, UploadError> {
    let kind = if mime_type.starts_with("image/") {
        MediaKind::Image
    } else if mime_type.starts_with("video/") {
        MediaKind::Video
    } else {
        return Err(UploadError::UnsupportedType(mime_type.to_string()));
    };

    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(size));
    }
    Ok(kind)
}

/// MIME type from the file extension
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// A file chosen by the user
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub contents: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: contents.len() as u64,
            contents,
        }
    }

    /// Read a file from disk. Type and size are checked from metadata
    /// before any contents are read.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let mime_type = guess_mime_type(path);
        let metadata = tokio::fs::metadata(path).await?;
        validate_selection(mime_type, metadata.len())?;

        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(name, mime_type, contents))
    }
}

/// Local preview of the selected file; built without network access
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub kind: MediaKind,
    pub file_name: String,
    pub size_bytes: u64,
}

impl Preview {
    /// Size in megabytes with two decimals, e.g. "1.50 MB"
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadDraft {
    pub file: SelectedFile,
    pub preview: Preview,
}

pub struct UploadView {
    session: Arc<SessionStore>,
    redirect_delay: Duration,
    draft: Option<UploadDraft>,
    caption: String,
    submitting: bool,
    redirect: Option<JoinHandle<()>>,
}

impl UploadView {
    pub fn new(session: Arc<SessionStore>, redirect_delay: Duration) -> Self {
        Self {
            session,
            redirect_delay,
            draft: None,
            caption: String::new(),
            submitting: false,
            redirect: None,
        }
    }

    pub fn draft(&self) -> Option<&UploadDraft> {
        self.draft.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        self.draft.is_some() && !self.submitting
    }

    /// Select a file. Invalid files are rejected with a toast and leave the
    /// current draft untouched.
    pub fn select(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        let kind = match validate_selection(&file.mime_type, file.size) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!(file = %file.name, "Rejected selection: {}", e);
                self.session.notifier().error(e.to_string());
                return Err(e);
            }
        };

        let preview = Preview {
            kind,
            file_name: file.name.clone(),
            size_bytes: file.size,
        };
        self.draft = Some(UploadDraft { file, preview });
        Ok(())
    }

    /// Load and select a file from disk
    pub async fn select_path(&mut self, path: &Path) -> Result<(), UploadError> {
        match SelectedFile::from_path(path).await {
            Ok(file) => self.select(file),
            Err(e) => {
                self.session.notifier().error(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the selected file; the caption is kept
    pub fn clear(&mut self) {
        self.draft = None;
    }

    /// Send the draft. On success the draft is cleared and the view returns
    /// to the feed after the redirect delay; on failure the draft is kept.
    pub async fn submit(&mut self) -> Result<Post, UploadError> {
        let Some(draft) = &self.draft else {
            self.session.notifier().error(UploadError::NoFile.to_string());
            return Err(UploadError::NoFile);
        };

        let request = UploadRequest {
            file_name: draft.file.name.clone(),
            mime_type: draft.file.mime_type.clone(),
            contents: draft.file.contents.clone(),
            caption: self.caption.clone(),
        };

        self.submitting = true;
        let result = self.session.api().upload(request).await;
        self.submitting = false;

        match result {
            Ok(post) => {
                tracing::info!(post_id = %post.id, "Posted");
                self.session.notifier().success("Posted successfully!");
                self.draft = None;
                self.caption.clear();
                self.redirect = Some(
                    self.session
                        .navigator()
                        .navigate_after(Route::Feed, self.redirect_delay),
                );
                Ok(post)
            }
            Err(e) => {
                tracing::warn!("Upload failed: {}", e);
                self.session
                    .notifier()
                    .error("Upload failed. Please try again.");
                Err(e.into())
            }
        }
    }

    /// Wait for the post-upload redirect, if one is scheduled
    pub async fn wait_for_redirect(&mut self) {
        if let Some(redirect) = self.redirect.take() {
            if let Err(e) = redirect.await {
                tracing::warn!("Redirect task failed: {}", e);
            }
        }
    }
}
