//! Backend client — the single point of entry for the resume analysis endpoint.
//!
//! Submissions are sent exactly once. There is no retry loop: a failed
//! analysis is surfaced to the user, who decides whether to resubmit.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::submission::composer::SubmissionRequest;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";
pub const ANALYZE_PATH: &str = "resumes/analyze/";
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed. Please try again.";

/// Keys checked, in priority order, for a user-facing message in an error body.
const SERVER_MESSAGE_KEYS: &[&str] = &["detail", "error", "message"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The one string shown to the user for this failure.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    match_score: f64,
    analysis: String,
}

/// A successful analysis as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub match_score: u8, // 0 – 100
    pub analysis: String,
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(response: AnalyzeResponse) -> Self {
        Self {
            match_score: normalize_score(response.match_score),
            analysis: response.analysis,
        }
    }
}

fn normalize_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// The analysis backend seam. `ApplicationBuilder` is generic over this so the
/// lifecycle can run against `ApiClient` or an in-memory fake.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, request: &SubmissionRequest) -> Result<AnalysisResult, ApiError>;
}

/// Authenticated HTTP client for the dashboard REST API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            token,
        })
    }

    /// Attaches the bearer token obtained at login.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), ANALYZE_PATH)
    }

    fn build_form(request: &SubmissionRequest) -> Result<Form, ApiError> {
        let mut form = Form::new();

        if let Some(file) = request.resume_file() {
            let part = Part::stream_with_length(file.content.clone(), file.content.len() as u64)
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("resume", part);
        }

        for (name, value) in request.text_fields() {
            form = form.text(name, value);
        }

        Ok(form)
    }
}

#[async_trait]
impl AnalysisBackend for ApiClient {
    async fn analyze(&self, request: &SubmissionRequest) -> Result<AnalysisResult, ApiError> {
        let form = Self::build_form(request)?;

        let mut builder = self.client.post(self.analyze_url()).multipart(form);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_server_message(&body);
            warn!("Analyze endpoint returned {}: {}", status, body);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AnalyzeResponse = serde_json::from_str(&body)?;
        debug!("Analysis succeeded: match_score={}", parsed.match_score);

        Ok(parsed.into())
    }
}

/// Pulls the first present message out of an error body.
/// Accepts both flat strings (`{"detail": "..."}`) and nested
/// `{"error": {"message": "..."}}` envelopes.
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    SERVER_MESSAGE_KEYS.iter().find_map(|key| {
        let field = value.get(key)?;
        let text = field
            .as_str()
            .or_else(|| field.get("message").and_then(|m| m.as_str()))?;
        (!text.trim().is_empty()).then(|| text.to_string())
    })
}
