use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use log::{debug, warn};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::ApiError;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Document,
    Audio,
}

impl AttachmentKind {
    /// Multipart field that carries the file.
    pub fn field_name(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Document => "document",
            AttachmentKind::Audio => "audio",
        }
    }

    pub fn default_prompt(self) -> &'static str {
        match self {
            AttachmentKind::Image => "Describe the following image:",
            AttachmentKind::Document => "Summarize the following document:",
            AttachmentKind::Audio => "Transcribe and analyze the following audio:",
        }
    }

    pub fn missing_file_message(self) -> &'static str {
        match self {
            AttachmentKind::Image => "File Gambar Dibutuhkan!",
            AttachmentKind::Document => "File Dokumen Dibutuhkan!",
            AttachmentKind::Audio => "File Audio Dibutuhkan!",
        }
    }
}

/// An upload buffered on disk. The file is removed when this value drops,
/// whatever the outcome of the request that created it.
#[derive(Debug)]
pub struct UploadedFile {
    path: PathBuf,
    mime_type: String,
    original_name: String,
    size: usize,
}

impl UploadedFile {
    fn new(dir: &Path, mime_type: String, original_name: String) -> Self {
        Self {
            path: dir.join(Uuid::new_v4().simple().to_string()),
            mime_type,
            original_name,
            size: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

impl Drop for UploadedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {}", self.path.display(), e),
        }
    }
}

/// Parsed multipart form of an attachment endpoint.
#[derive(Debug)]
pub struct AttachmentForm {
    pub prompt: Option<String>,
    pub file: Option<UploadedFile>,
}

impl AttachmentForm {
    /// The submitted prompt, or the kind's default when it is absent or blank.
    pub fn prompt_or_default(&self, kind: AttachmentKind) -> String {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(kind.default_prompt())
            .to_string()
    }
}

/// Streams the multipart body: the file field is written to `upload_dir`,
/// `prompt` is kept as text, anything else is drained. Only the first file
/// under the expected field name is kept.
pub async fn read_attachment_form(
    mut payload: Multipart,
    kind: AttachmentKind,
    upload_dir: &Path,
    max_bytes: usize,
) -> Result<AttachmentForm, ApiError> {
    let mut form = AttachmentForm {
        prompt: None,
        file: None,
    };

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(str::to_string);

        match (name.as_str(), filename) {
            ("prompt", None) => {
                let bytes = read_field(&mut field, max_bytes).await?;
                form.prompt = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            (field_name, Some(filename))
                if field_name == kind.field_name() && !filename.is_empty() && form.file.is_none() =>
            {
                let mime_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| FALLBACK_MIME.to_string());
                let mut upload = UploadedFile::new(upload_dir, mime_type, filename);
                write_field(&mut field, &mut upload, max_bytes).await?;
                debug!(
                    "Buffered {} upload {:?} ({} bytes) at {}",
                    kind.field_name(),
                    upload.original_name,
                    upload.size,
                    upload.path.display()
                );
                form.file = Some(upload);
            }
            _ => {
                while field.try_next().await.map_err(malformed)?.is_some() {}
            }
        }
    }

    Ok(form)
}

async fn write_field(field: &mut Field, upload: &mut UploadedFile, max_bytes: usize) -> Result<(), ApiError> {
    // `upload` owns the path from here on, so early returns still clean up
    let mut file = tokio::fs::File::create(&upload.path).await?;
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        upload.size += chunk.len();
        if upload.size > max_bytes {
            return Err(too_large(max_bytes));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

async fn read_field(field: &mut Field, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn malformed(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::validation(format!("Malformed multipart body: {}", err))
}

fn too_large(max_bytes: usize) -> ApiError {
    ApiError::validation(format!(
        "File terlalu besar. Maksimal {}MB.",
        max_bytes / (1024 * 1024)
    ))
}
