use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::broadcast::Receiver;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use builder::config::Config;
use builder::submission::lifecycle::{ApplicationBuilder, SubmissionOutcome};
use builder::toast::{ToastEvent, ToastQueue};
use builder::upload::validator::format_file_size;
use builder::{ApiClient, ResumeFile};

/// Submit a resume and a job description for match analysis.
#[derive(Debug, Parser)]
#[command(name = "builder", version)]
struct Cli {
    /// PDF resume to upload
    #[arg(long, conflicts_with = "use_latest")]
    resume: Option<PathBuf>,

    /// Use the most recent resume already stored on the server
    #[arg(long)]
    use_latest: bool,

    /// File containing the job description
    #[arg(long, conflicts_with = "job_text")]
    job: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    job_text: Option<String>,

    /// Also generate a cover letter
    #[arg(long)]
    cover_letter: bool,

    /// Also generate a networking message
    #[arg(long)]
    network_message: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Application builder v{}", env!("CARGO_PKG_VERSION"));

    let mut client = ApiClient::new(config.api_base_url.clone(), None, config.http_timeout())?;
    match &config.api_token {
        Some(token) => client.set_auth_token(token.clone()),
        None => warn!("API_TOKEN not set; submitting unauthenticated"),
    }
    info!("Backend: {}", client.analyze_url());

    let toasts = ToastQueue::new(config.toast_ttl());
    let mut toast_events = toasts.subscribe();
    let mut app = ApplicationBuilder::new(client, toasts);

    if let Some(path) = &cli.resume {
        let file = ResumeFile::from_path(path).await?;
        let size = format_file_size(file.size_bytes);
        let name = file.name.clone();
        let accepted = app.select_file(Some(file));
        print_toasts(&mut toast_events);
        accepted?;
        println!("Resume: {name} ({size})");
    }
    app.set_use_latest(cli.use_latest);

    let job_text = match (&cli.job, cli.job_text) {
        (Some(path), _) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description '{}'", path.display()))?,
        (None, Some(text)) => text,
        (None, None) => String::new(),
    };
    app.set_job_text(job_text);
    app.set_include_cover_letter(cli.cover_letter);
    app.set_include_network_message(cli.network_message);

    let hint = app.job_description_hint();
    println!("{}", hint.counter);

    let outcome = app.submit().await;
    print_toasts(&mut toast_events);

    match outcome? {
        SubmissionOutcome::Success { .. } => {
            if let Some(report) = app.last_report() {
                println!(
                    "\nMatch score: {}% ({:?})\n",
                    report.match_score, report.strength
                );
                for (i, segment) in report.segments.iter().enumerate() {
                    println!("{}. {}", i + 1, segment);
                }
            }
            Ok(())
        }
        SubmissionOutcome::Failure { display_message } => bail!(display_message),
    }
}

fn print_toasts(events: &mut Receiver<ToastEvent>) {
    while let Ok(event) = events.try_recv() {
        if let ToastEvent::Shown(toast) = event {
            println!("[{:?}] {}", toast.severity, toast.message);
        }
    }
}
