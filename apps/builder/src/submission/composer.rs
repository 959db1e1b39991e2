//! Submission Composer — turns resolved form fields into an immutable `SubmissionRequest`.
//!
//! Trimming of the job description happens here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::errors::CompositionError;
use crate::upload::{ResumeFile, ResumeSource};

pub const MIN_JOB_DESCRIPTION_LENGTH: usize = 50;

/// Optional outputs requested alongside the match analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub include_cover_letter: bool,
    pub include_network_message: bool,
}

/// A resume source that is known to be usable for submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedResume {
    Upload(ResumeFile),
    UseLatest,
}

/// A fully validated analysis request. Only `compose` can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    resume: ResolvedResume,
    job_description: String,
    options: AnalysisOptions,
}

impl SubmissionRequest {
    pub fn resume(&self) -> &ResolvedResume {
        &self.resume
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    pub fn resume_file(&self) -> Option<&ResumeFile> {
        match &self.resume {
            ResolvedResume::Upload(file) => Some(file),
            ResolvedResume::UseLatest => None,
        }
    }

    /// Multipart text fields in wire order. The `resume` binary part, when
    /// present, is attached separately by the HTTP client.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(4);
        if matches!(self.resume, ResolvedResume::UseLatest) {
            fields.push(("use_latest_resume", "true".to_string()));
        }
        fields.push(("job_description", self.job_description.clone()));
        fields.push((
            "include_cover_letter",
            self.options.include_cover_letter.to_string(),
        ));
        fields.push((
            "include_network_message",
            self.options.include_network_message.to_string(),
        ));
        fields
    }
}

/// Validates the form fields and builds a request, or reports the first blocking problem.
///
/// Checks, in order: resume resolved, job description non-empty, job description
/// at least `MIN_JOB_DESCRIPTION_LENGTH` characters after trimming.
pub fn compose(
    source: &ResumeSource,
    job_text: &str,
    options: AnalysisOptions,
) -> Result<SubmissionRequest, CompositionError> {
    let resume = match source {
        ResumeSource::Unresolved => return Err(CompositionError::MissingResume),
        ResumeSource::Uploaded(file) => ResolvedResume::Upload(file.clone()),
        ResumeSource::UseLatestOnFile => ResolvedResume::UseLatest,
    };

    let trimmed = job_text.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        return Err(CompositionError::MissingJobDescription);
    }
    if length < MIN_JOB_DESCRIPTION_LENGTH {
        return Err(CompositionError::JobDescriptionTooShort {
            needed: MIN_JOB_DESCRIPTION_LENGTH - length,
        });
    }

    Ok(SubmissionRequest {
        resume,
        job_description: trimmed.to_string(),
        options,
    })
}

/// Live counter shown under the job description input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptionHint {
    /// e.g. `"12/50 minimum characters"` (raw, untrimmed length)
    pub counter: String,
    /// e.g. `"Need 38 more characters"` while the trimmed text is non-empty but short
    pub shortfall: Option<String>,
}

pub fn job_description_hint(job_text: &str) -> JobDescriptionHint {
    let raw_length = job_text.chars().count();
    let trimmed_length = job_text.trim().chars().count();

    let shortfall = (trimmed_length > 0 && trimmed_length < MIN_JOB_DESCRIPTION_LENGTH).then(|| {
        format!(
            "Need {} more characters",
            MIN_JOB_DESCRIPTION_LENGTH - trimmed_length
        )
    });

    JobDescriptionHint {
        counter: format!("{raw_length}/{MIN_JOB_DESCRIPTION_LENGTH} minimum characters"),
        shortfall,
    }
}
