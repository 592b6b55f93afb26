//! Command-line entry point: parse arguments, run one session, render it.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use global_tech_feed::api::GeminiClient;
use global_tech_feed::cli::Cli;
use global_tech_feed::config;
use global_tech_feed::credential::CredentialStore;
use global_tech_feed::models::Feed;
use global_tech_feed::outputs::{json, markdown};
use global_tech_feed::session::{Session, SessionStatus};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("global_tech_feed starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.json_output_dir, ?args.select, "Parsed CLI arguments");

    // ---- Load config ----
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::Config::default(),
    }
    .with_overrides(args.model.clone(), args.api_base.clone());
    config.endpoint()?;

    // ---- Credential ----
    let mut session = Session::new(CredentialStore::new());
    let credential = match args.api_key.as_deref().map(|key| session.submit_key(key)) {
        Some(Ok(credential)) => credential,
        Some(Err(e)) => {
            warn!(error = %e, "Rejected API key");
            emit(&args, &markdown::render_view(session.state().view())).await?;
            return Err(e.into());
        }
        None => {
            emit(&args, &markdown::render_view(session.state().view())).await?;
            return Ok(());
        }
    };

    // ---- Fetch and translate ----
    let client = GeminiClient::new(&config, credential)?;
    info!(model = %config.model, "Loading news");
    let report = session.load(&client).await;

    if session.status() == SessionStatus::Ready {
        if let Some(dir) = &args.json_output_dir {
            let feed = Feed::now(session.state().articles.clone());
            if let Err(e) = json::write_feed(&feed, dir).await {
                error!(error = %e, "Failed to write feed JSON");
            }
        }
        if let Some(id) = args.select {
            if session.select(id).is_none() {
                warn!(id, "No article with that id; showing the feed");
            }
        }
    }

    emit(&args, &markdown::render_view(session.state().view())).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        status = ?session.status(),
        articles = session.state().articles.len(),
        processed = report.map(|r| r.total()).unwrap_or(0),
        untranslated = report.map(|r| r.untranslated).unwrap_or(0),
        "Execution complete"
    );

    match &session.state().error {
        Some(message) => Err(message.clone().into()),
        None => Ok(()),
    }
}

/// Write rendered Markdown to the configured file, or stdout.
async fn emit(args: &Cli, md: &str) -> Result<(), Box<dyn Error>> {
    match &args.markdown_output {
        Some(path) => {
            tokio::fs::write(path, md).await?;
            info!(%path, "Wrote Markdown");
        }
        None => println!("{md}"),
    }
    Ok(())
}
