pub mod api_client;
pub mod config;
pub mod errors;
pub mod presenter;
pub mod submission;
pub mod toast;
pub mod upload;

pub use api_client::{AnalysisBackend, AnalysisResult, ApiClient, ApiError};
pub use errors::{CompositionError, FileValidationError, SubmitRejected};
pub use presenter::{AnalysisReport, MatchStrength};
pub use submission::composer::{compose, AnalysisOptions, SubmissionRequest};
pub use submission::lifecycle::{ApplicationBuilder, FormState, Phase, SubmissionOutcome};
pub use toast::{Severity, ToastEvent, ToastNotification, ToastQueue};
pub use upload::{ResumeFile, ResumeSource};
