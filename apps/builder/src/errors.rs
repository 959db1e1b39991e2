use thiserror::Error;

use crate::submission::composer::MIN_JOB_DESCRIPTION_LENGTH;

/// Rejection raised when a candidate resume file fails format or size checks.
/// Recoverable: the user picks another file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileValidationError {
    #[error("{0}")]
    Format(String),

    #[error("{0}")]
    Size(String),
}

impl FileValidationError {
    pub fn message(&self) -> &str {
        match self {
            FileValidationError::Format(msg) | FileValidationError::Size(msg) => msg,
        }
    }
}

/// Reasons the composer refuses to build a request.
/// These block submission locally and are never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("Please upload a resume or choose to use your latest resume.")]
    MissingResume,

    #[error("Please enter a job description.")]
    MissingJobDescription,

    #[error(
        "Job description must be at least {min} characters long. Need {needed} more characters.",
        min = MIN_JOB_DESCRIPTION_LENGTH
    )]
    JobDescriptionTooShort { needed: usize },
}

/// Why a lifecycle transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error(transparent)]
    Invalid(#[from] CompositionError),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("No submission is in progress")]
    NotInFlight,
}
