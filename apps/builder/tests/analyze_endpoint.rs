use std::time::Duration;

use bytes::Bytes;
use mockito::Matcher;

use builder::api_client::{AnalysisBackend, ApiError, GENERIC_FAILURE_MESSAGE};
use builder::submission::lifecycle::{ApplicationBuilder, Phase, SubmissionOutcome};
use builder::toast::{Severity, ToastQueue};
use builder::upload::PDF_MIME_TYPE;
use builder::{compose, AnalysisOptions, ApiClient, ResumeFile, ResumeSource};

const JOB_DESCRIPTION: &str = "Platform engineer wanted: Rust, Kubernetes, Postgres, on-call rotation and mentoring.";

fn client(server: &mockito::Server) -> ApiClient {
    ApiClient::new(
        format!("{}/api/", server.url()),
        Some("test-token".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn pdf() -> ResumeFile {
    ResumeFile::new(
        "jane_doe.pdf",
        PDF_MIME_TYPE,
        Bytes::from_static(b"%PDF-1.7 fake resume body"),
    )
}

#[tokio::test]
async fn test_upload_sends_multipart_fields_and_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/resumes/analyze/")
        .match_header("authorization", "Bearer test-token")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="resume"; filename="jane_doe.pdf""#.to_string()),
            Matcher::Regex(r#"name="job_description"\s+Platform engineer wanted"#.to_string()),
            Matcher::Regex(r#"name="include_cover_letter"\s+true"#.to_string()),
            Matcher::Regex(r#"name="include_network_message"\s+false"#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"match_score": 87, "analysis": "1) Strong match 2) Add keywords"}"#)
        .expect(1)
        .create_async()
        .await;

    let options = AnalysisOptions {
        include_cover_letter: true,
        include_network_message: false,
    };
    let request = compose(&ResumeSource::Uploaded(pdf()), JOB_DESCRIPTION, options).unwrap();

    let result = client(&server).analyze(&request).await.unwrap();
    assert_eq!(result.match_score, 87);
    assert_eq!(result.analysis, "1) Strong match 2) Add keywords");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_use_latest_sends_marker_without_file_part() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/resumes/analyze/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="use_latest_resume"\s+true"#.to_string()),
            Matcher::Regex(r#"name="include_network_message"\s+true"#.to_string()),
        ]))
        .with_status(201)
        .with_body(r#"{"match_score": 72.6, "analysis": "Decent"}"#)
        .create_async()
        .await;

    let options = AnalysisOptions {
        include_cover_letter: false,
        include_network_message: true,
    };
    let request = compose(&ResumeSource::UseLatestOnFile, JOB_DESCRIPTION, options).unwrap();

    let result = client(&server).analyze(&request).await.unwrap();
    assert_eq!(result.match_score, 73);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_body_detail_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/resumes/analyze/")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Bad file"}"#)
        .create_async()
        .await;

    let request =
        compose(&ResumeSource::UseLatestOnFile, JOB_DESCRIPTION, AnalysisOptions::default())
            .unwrap();
    let err = client(&server).analyze(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 400, .. }));
    assert_eq!(err.display_message(), "Bad file");
}

#[tokio::test]
async fn test_unparseable_error_body_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/resumes/analyze/")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let request =
        compose(&ResumeSource::UseLatestOnFile, JOB_DESCRIPTION, AnalysisOptions::default())
            .unwrap();
    let err = client(&server).analyze(&request).await.unwrap_err();

    assert_eq!(err.display_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/resumes/analyze/")
        .with_status(200)
        .with_body(r#"{"score": 10}"#)
        .create_async()
        .await;

    let request =
        compose(&ResumeSource::UseLatestOnFile, JOB_DESCRIPTION, AnalysisOptions::default())
            .unwrap();
    let err = client(&server).analyze(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::Parse(_)));
    assert_eq!(err.display_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let client = ApiClient::new("http://127.0.0.1:1/api/", None, Duration::from_secs(2)).unwrap();
    let request =
        compose(&ResumeSource::UseLatestOnFile, JOB_DESCRIPTION, AnalysisOptions::default())
            .unwrap();

    let err = client.analyze(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(err.display_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_full_cycle_success_resets_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/resumes/analyze/")
        .with_status(200)
        .with_body(r#"{"match_score": 87, "analysis": "1) Strong match 2) Add keywords"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut app = ApplicationBuilder::new(client(&server), ToastQueue::default());
    app.select_file(Some(pdf())).unwrap();
    app.set_job_text(JOB_DESCRIPTION);
    app.set_include_cover_letter(true);

    let outcome = app.submit().await.unwrap();
    assert!(matches!(
        outcome,
        SubmissionOutcome::Success { match_score: 87, .. }
    ));
    assert_eq!(
        app.last_report().unwrap().segments,
        vec!["Strong match", "Add keywords"]
    );
    assert_eq!(app.form().job_text, "");
    assert!(!app.form().options.include_cover_letter);
    assert_eq!(app.form().source, ResumeSource::Unresolved);
    assert_eq!(app.phase(), Phase::Idle);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_full_cycle_failure_keeps_form_for_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/resumes/analyze/")
        .with_status(400)
        .with_body(r#"{"error": "Resume could not be parsed"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut app = ApplicationBuilder::new(client(&server), ToastQueue::default());
    app.select_file(Some(pdf())).unwrap();
    app.set_job_text(JOB_DESCRIPTION);
    let before = app.form().clone();

    let outcome = app.submit().await.unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Failure {
            display_message: "Resume could not be parsed".to_string()
        }
    );

    let toast = app.toasts().current().unwrap();
    assert_eq!(toast.severity, Severity::Error);
    assert_eq!(toast.message, "Resume could not be parsed");
    assert_eq!(app.form(), &before);
    assert!(app.can_submit());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blocked_submit_never_reaches_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/resumes/analyze/")
        .expect(0)
        .create_async()
        .await;

    let mut app = ApplicationBuilder::new(client(&server), ToastQueue::default());
    app.set_use_latest(true);
    app.set_job_text("Too short");

    assert!(app.submit().await.is_err());
    assert_eq!(
        app.toasts().current().unwrap().severity,
        Severity::Warning
    );
    mock.assert_async().await;
}
