// Resume intake: the candidate file, the chosen resume source, and its validation rules.

pub mod validator;

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

pub const PDF_MIME_TYPE: &str = "application/pdf";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A resume file picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub content: Bytes,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Reads a file from disk. The MIME type is inferred from the extension only;
    /// content sniffing is left to the backend.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read resume file '{}'", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        Ok(Self::new(name, mime_type_for(path), Bytes::from(content)))
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME_TYPE,
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Where the resume for an analysis comes from.
///
/// A fresh upload and the "use latest resume on file" flag are mutually
/// exclusive variants, so both can never be active at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResumeSource {
    #[default]
    Unresolved,
    Uploaded(ResumeFile),
    UseLatestOnFile,
}

impl ResumeSource {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, ResumeSource::Unresolved)
    }

    pub fn uploaded_file(&self) -> Option<&ResumeFile> {
        match self {
            ResumeSource::Uploaded(file) => Some(file),
            _ => None,
        }
    }
}
