use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use chrono::Utc;
use mime::Mime;
use rand::Rng;
use tracing::warn;

use super::validation::{FieldError, FieldErrorCode};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_UPLOAD_FIELD: &str = "resume";

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];
const FORM_FIELD_ALLOWANCE: usize = 64 * 1024;

/// Where and how resumes are stored. Passed to [`ResumeStore`] at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub directory: PathBuf,
    pub max_bytes: usize,
    pub field_name: String,
}

impl UploadConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            field_name: DEFAULT_UPLOAD_FIELD.to_string(),
        }
    }

    /// Request body ceiling for the signup route. Large enough that an oversize file is
    /// caught by the per-file check instead of the transport limit.
    pub fn body_limit(&self) -> usize {
        self.max_bytes
            .saturating_mul(2)
            .saturating_add(FORM_FIELD_ALLOWANCE)
    }
}

/// A screened resume held in memory and not yet written anywhere.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    extension: String,
    content_type: Mime,
    bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResume {
    path: PathBuf,
}

impl StoredResume {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reference recorded as the signup's `resumeUrl`.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid file type. Only PDF, DOC, and DOCX files are allowed.")]
    InvalidFileType { file_name: String },
    #[error("File too large. Maximum size is {}.", describe_size(.limit))]
    TooLarge { limit: usize },
    #[error("Only one resume may be attached.")]
    TooManyFiles,
    #[error("Failed to read uploaded file: {0}")]
    Read(#[source] MultipartError),
    #[error("failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

impl UploadError {
    /// Client-facing field error, or `None` when the failure is on the server side.
    pub fn field_error(&self, field: &str) -> Option<FieldError> {
        let code = match self {
            UploadError::InvalidFileType { .. } => FieldErrorCode::InvalidFileType,
            UploadError::TooLarge { .. } => FieldErrorCode::FileTooLarge,
            UploadError::TooManyFiles => FieldErrorCode::TooManyFiles,
            UploadError::Read(_) => FieldErrorCode::MalformedBody,
            UploadError::Storage(_) => return None,
        };
        Some(FieldError::new(field, code, self.to_string()))
    }
}

fn describe_size(bytes: &usize) -> String {
    const MIB: usize = 1024 * 1024;
    if *bytes >= MIB && *bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Screens, buffers and persists resume attachments for doctor signups.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    config: UploadConfig,
}

impl ResumeStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Checks the file name and declared content type before any bytes are read. Returns the
    /// normalized extension and the effective content type.
    pub fn screen(
        &self,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<(String, Mime), UploadError> {
        let invalid = || UploadError::InvalidFileType {
            file_name: file_name.to_string(),
        };

        let extension = Path::new(file_name)
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .filter(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()))
            .ok_or_else(invalid)?;

        let content_type = match content_type {
            Some(declared) => declared
                .parse::<Mime>()
                .ok()
                .filter(|mime| ALLOWED_CONTENT_TYPES.contains(&mime.essence_str()))
                .ok_or_else(invalid)?,
            None => mime_guess::from_ext(&extension).first_or_octet_stream(),
        };

        Ok((extension, content_type))
    }

    /// Screens an attachment that is already in memory.
    pub fn accept(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<ResumeUpload, UploadError> {
        let (extension, content_type) = self.screen(file_name, content_type)?;
        if bytes.len() > self.config.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.config.max_bytes,
            });
        }

        Ok(ResumeUpload {
            extension,
            content_type,
            bytes,
        })
    }

    /// Buffers a multipart file part chunk by chunk, failing as soon as it crosses the size
    /// limit. A part without a file name is treated as "no file attached".
    pub async fn receive(&self, mut field: Field<'_>) -> Result<Option<ResumeUpload>, UploadError> {
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            return Ok(None);
        };

        let (extension, content_type) = self.screen(&file_name, field.content_type())?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| self.read_failure(err))?
        {
            if bytes.len() + chunk.len() > self.config.max_bytes {
                return Err(UploadError::TooLarge {
                    limit: self.config.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(Some(ResumeUpload {
            extension,
            content_type,
            bytes,
        }))
    }

    /// Maps a multipart read failure, treating a tripped body limit as an oversize file.
    pub fn read_failure(&self, err: MultipartError) -> UploadError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge {
                limit: self.config.max_bytes,
            }
        } else {
            UploadError::Read(err)
        }
    }

    pub async fn persist(&self, upload: &ResumeUpload) -> Result<StoredResume, UploadError> {
        let path = self.config.directory.join(self.stored_name(&upload.extension));
        tokio::fs::create_dir_all(&self.config.directory).await?;
        tokio::fs::write(&path, &upload.bytes).await?;
        Ok(StoredResume { path })
    }

    /// Best-effort removal of a file whose signup was not stored.
    pub async fn discard(&self, stored: &StoredResume) {
        if let Err(err) = tokio::fs::remove_file(stored.path()).await {
            warn!(path = %stored.path().display(), %err, "failed to remove orphaned resume");
        }
    }

    fn stored_name(&self, extension: &str) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        format!(
            "{}-{}-{}.{}",
            self.config.field_name,
            Utc::now().timestamp_millis(),
            suffix,
            extension
        )
    }
}
