//! File validation for resume uploads.
//!
//! Rules are checked in order and the first failure wins:
//! 1. MIME type must be in `ALLOWED_MIME_TYPES`
//! 2. Size must not exceed `MAX_FILE_SIZE_BYTES`

use crate::errors::FileValidationError;
use crate::upload::{ResumeFile, PDF_MIME_TYPE};

pub const ALLOWED_MIME_TYPES: &[&str] = &[PDF_MIME_TYPE];
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

/// Checks a candidate resume. Has no side effects; the caller owns state and notifications.
pub fn validate(file: &ResumeFile) -> Result<(), FileValidationError> {
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(FileValidationError::Format(
            "Please upload a PDF file only.".to_string(),
        ));
    }

    if file.size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(FileValidationError::Size(format!(
            "File size must be less than {}MB.",
            MAX_FILE_SIZE_BYTES / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Human-readable size for the selected-file card, e.g. `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", SIZE_UNITS[unit])
}
