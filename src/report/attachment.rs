//! File attachment intake: media-type whitelist and per-file size ceiling.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default per-file ceiling: 10 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Media types accepted as report attachments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
    Pdf,
    Docx,
    Xlsx,
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(MediaType::Jpeg),
            "image/png" => Some(MediaType::Png),
            "application/pdf" => Some(MediaType::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(MediaType::Docx)
            }
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                Some(MediaType::Xlsx)
            }
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "pdf" => Some(MediaType::Pdf),
            "docx" => Some(MediaType::Docx),
            "xlsx" => Some(MediaType::Xlsx),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaType::Jpeg => "JPG",
            MediaType::Png => "PNG",
            MediaType::Pdf => "PDF",
            MediaType::Docx => "DOCX",
            MediaType::Xlsx => "XLSX",
        };
        f.write_str(label)
    }
}

/// An accepted attachment recorded on the draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileAttachment {
    pub id: Uuid,
    pub file_name: String,
    pub media_type: MediaType,
    pub size_bytes: u64,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, media_type: MediaType, size_bytes: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            media_type,
            size_bytes,
        }
    }

    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// A file offered for intake, before the policy has looked at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileCandidate {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Builds a candidate from a path on disk, deriving the media type from
    /// the extension and the size from file metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = path
            .extension()
            .and_then(|ext| MediaType::from_extension(&ext.to_string_lossy()))
            .map(mime_of)
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            file_name,
            mime_type: mime,
            size_bytes: metadata.len(),
        })
    }
}

fn mime_of(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Jpeg => "image/jpeg",
        MediaType::Png => "image/png",
        MediaType::Pdf => "application/pdf",
        MediaType::Docx => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        MediaType::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    }
}

/// Why a candidate was dropped from the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedFormat,
    TooLarge,
}

/// A dropped candidate plus a user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedFile {
    pub file_name: String,
    pub reason: RejectReason,
}

impl RejectedFile {
    /// Notification text shown to the reporter.
    pub fn message(&self) -> String {
        match self.reason {
            RejectReason::UnsupportedFormat => {
                format!("Файл {} имеет неподдерживаемый формат", self.file_name)
            }
            RejectReason::TooLarge => {
                format!("Файл {} слишком большой (максимум 10 МБ)", self.file_name)
            }
        }
    }
}

/// Result of admitting one batch: rejected files never abort the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeOutcome {
    pub accepted: Vec<FileAttachment>,
    pub rejected: Vec<RejectedFile>,
}

/// Intake policy applied to every offered batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentPolicy {
    pub max_bytes: u64,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_ATTACHMENT_BYTES,
        }
    }
}

impl AttachmentPolicy {
    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Screens a batch: each candidate is accepted iff its media type is on
    /// the whitelist and its size is within the ceiling. Other candidates in
    /// the same batch are unaffected by a rejection.
    pub fn admit(&self, batch: Vec<FileCandidate>) -> IntakeOutcome {
        let mut outcome = IntakeOutcome::default();
        for candidate in batch {
            match MediaType::from_mime(&candidate.mime_type) {
                None => outcome.rejected.push(RejectedFile {
                    file_name: candidate.file_name,
                    reason: RejectReason::UnsupportedFormat,
                }),
                Some(_) if candidate.size_bytes > self.max_bytes => {
                    outcome.rejected.push(RejectedFile {
                        file_name: candidate.file_name,
                        reason: RejectReason::TooLarge,
                    })
                }
                Some(media_type) => outcome.accepted.push(FileAttachment::new(
                    candidate.file_name,
                    media_type,
                    candidate.size_bytes,
                )),
            }
        }
        outcome
    }
}
