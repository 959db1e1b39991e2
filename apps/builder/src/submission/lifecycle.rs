//! Submission Lifecycle — the state machine behind the Application Builder page.
//!
//! `Idle → Validating → Submitting → (Success | Failed) → Idle`
//!
//! `Validating` runs synchronously inside `begin_submit`, and both terminal
//! states fold straight back to `Idle` inside `finish_submit`, so the only
//! phases ever observable are `Idle` and `Submitting`. The phase doubles as
//! the single in-flight flag.

use serde::Serialize;
use tracing::{info, warn};

use crate::api_client::{AnalysisBackend, AnalysisResult, ApiError};
use crate::errors::{CompositionError, FileValidationError, SubmitRejected};
use crate::presenter::{self, AnalysisReport};
use crate::submission::composer::{
    compose, job_description_hint, AnalysisOptions, JobDescriptionHint, SubmissionRequest,
};
use crate::toast::{Severity, ToastQueue};
use crate::upload::validator;
use crate::upload::{ResumeFile, ResumeSource};

pub const UPLOAD_ACCEPTED_MESSAGE: &str = "Resume uploaded successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Submitting,
}

/// Everything the user has entered on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub source: ResumeSource,
    pub file_error: Option<FileValidationError>,
    pub job_text: String,
    pub options: AnalysisOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Success {
        match_score: u8,
        analysis_text: String,
    },
    Failure {
        display_message: String,
    },
}

/// Owns the form, the in-flight flag and the toast slot. All mutation goes
/// through the methods below.
pub struct ApplicationBuilder<B: AnalysisBackend> {
    backend: B,
    form: FormState,
    phase: Phase,
    toasts: ToastQueue,
    last_report: Option<AnalysisReport>,
}

impl<B: AnalysisBackend> ApplicationBuilder<B> {
    pub fn new(backend: B, toasts: ToastQueue) -> Self {
        Self {
            backend,
            form: FormState::default(),
            phase: Phase::Idle,
            toasts,
            last_report: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn last_report(&self) -> Option<&AnalysisReport> {
        self.last_report.as_ref()
    }

    // ── Form input ──────────────────────────────────────────────────────────

    /// Handles a file picked or dropped by the user. `None` clears the selection.
    pub fn select_file(&mut self, file: Option<ResumeFile>) -> Result<(), FileValidationError> {
        self.form.file_error = None;

        let Some(file) = file else {
            self.clear_upload();
            return Ok(());
        };

        if let Err(err) = validator::validate(&file) {
            warn!(name = %file.name, "Rejected resume file: {err}");
            self.form.source = ResumeSource::Unresolved;
            self.form.file_error = Some(err.clone());
            self.toasts.show(err.message(), Severity::Error);
            return Err(err);
        }

        info!(
            name = %file.name,
            size = %validator::format_file_size(file.size_bytes),
            "Resume file accepted"
        );
        self.form.source = ResumeSource::Uploaded(file);
        self.toasts.show(UPLOAD_ACCEPTED_MESSAGE, Severity::Success);
        Ok(())
    }

    pub fn remove_file(&mut self) {
        self.clear_upload();
        self.form.file_error = None;
    }

    /// Toggles "use my latest resume on file". Turning it on drops any uploaded file.
    pub fn set_use_latest(&mut self, use_latest: bool) {
        if use_latest {
            self.form.source = ResumeSource::UseLatestOnFile;
            self.form.file_error = None;
        } else if self.form.source == ResumeSource::UseLatestOnFile {
            self.form.source = ResumeSource::Unresolved;
        }
    }

    pub fn set_job_text(&mut self, text: impl Into<String>) {
        self.form.job_text = text.into();
    }

    pub fn set_include_cover_letter(&mut self, include: bool) {
        self.form.options.include_cover_letter = include;
    }

    pub fn set_include_network_message(&mut self, include: bool) {
        self.form.options.include_network_message = include;
    }

    pub fn job_description_hint(&self) -> JobDescriptionHint {
        job_description_hint(&self.form.job_text)
    }

    fn clear_upload(&mut self) {
        if matches!(self.form.source, ResumeSource::Uploaded(_)) {
            self.form.source = ResumeSource::Unresolved;
        }
    }

    // ── Submission ──────────────────────────────────────────────────────────

    fn compose_current(&self) -> Result<SubmissionRequest, CompositionError> {
        compose(&self.form.source, &self.form.job_text, self.form.options)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && self.compose_current().is_ok()
    }

    /// `Idle → Submitting`. On a composer failure raises a warning toast and stays `Idle`.
    pub fn begin_submit(&mut self) -> Result<SubmissionRequest, SubmitRejected> {
        if self.phase == Phase::Submitting {
            warn!("Submit ignored: a submission is already in flight");
            return Err(SubmitRejected::InFlight);
        }

        match self.compose_current() {
            Ok(request) => {
                info!(
                    use_latest = request.resume_file().is_none(),
                    cover_letter = request.options().include_cover_letter,
                    network_message = request.options().include_network_message,
                    "Submitting application for analysis"
                );
                self.phase = Phase::Submitting;
                Ok(request)
            }
            Err(err) => {
                warn!("Submit blocked: {err}");
                self.toasts.show(err.to_string(), Severity::Warning);
                Err(err.into())
            }
        }
    }

    /// `Submitting → (Success | Failed) → Idle`.
    ///
    /// A result arriving while `Idle` belongs to no cycle and is dropped
    /// without touching the form.
    pub fn finish_submit(
        &mut self,
        result: Result<AnalysisResult, ApiError>,
    ) -> Result<SubmissionOutcome, SubmitRejected> {
        if self.phase != Phase::Submitting {
            warn!("Result ignored: no submission is in flight");
            return Err(SubmitRejected::NotInFlight);
        }
        self.phase = Phase::Idle;

        let outcome = match result {
            Ok(analysis) => {
                info!(match_score = analysis.match_score, "Analysis complete");
                self.last_report = Some(presenter::present(
                    analysis.match_score,
                    &analysis.analysis,
                ));
                self.toasts.show(
                    format!(
                        "Analysis complete! Match score: {}%",
                        analysis.match_score
                    ),
                    Severity::Success,
                );
                self.reset_after_success();

                SubmissionOutcome::Success {
                    match_score: analysis.match_score,
                    analysis_text: analysis.analysis,
                }
            }
            Err(err) => {
                warn!("Analysis failed: {err}");
                let display_message = err.display_message();
                self.toasts.show(display_message.clone(), Severity::Error);

                SubmissionOutcome::Failure { display_message }
            }
        };
        Ok(outcome)
    }

    /// Runs one full cycle against the backend. Not retried on failure.
    pub async fn submit(&mut self) -> Result<SubmissionOutcome, SubmitRejected> {
        let request = self.begin_submit()?;
        let result = self.backend.analyze(&request).await;
        self.finish_submit(result)
    }

    fn reset_after_success(&mut self) {
        self.form.job_text.clear();
        self.clear_upload();
        self.form.file_error = None;
        self.form.options = AnalysisOptions::default();
    }
}
