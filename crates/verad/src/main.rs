//! Vera Daemon - member question-answering service.
//!
//! Fetches the member message corpus from upstream, keeps an immutable
//! snapshot, and answers questions over HTTP with evidence-constrained
//! extraction. If the upstream is down, every question is refused with
//! the standard literal until it recovers.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vera_common::AnswerEngine;
use verad::config::VeradConfig;
use verad::fetcher;
use verad::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Vera Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = VeradConfig::load();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.upstream.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let state = Arc::new(AppState::new());

    // Initial corpus load. Failure is systemic, not fatal: the daemon
    // serves refusals until the first successful refresh.
    match fetcher::fetch_messages(&client, &config.upstream.url).await {
        Ok(messages) => {
            let engine = AnswerEngine::new(messages);
            info!(
                "Corpus loaded: {} messages, {} members",
                engine.message_count(),
                engine.member_count()
            );
            state.install_engine(engine).await;
        }
        Err(e) => {
            error!("Upstream unavailable at startup: {}", e);
        }
    }

    // Periodic refresh keeps the snapshot current; a failed refresh
    // keeps the previous snapshot in place.
    let refresh_state = state.clone();
    let refresh_url = config.upstream.url.clone();
    let refresh_interval = Duration::from_secs(config.upstream.refresh_interval_secs);
    tokio::spawn(async move {
        let mut ticker = time::interval(refresh_interval);
        ticker.tick().await; // first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            match fetcher::fetch_messages(&client, &refresh_url).await {
                Ok(messages) => {
                    let engine = AnswerEngine::new(messages);
                    info!(
                        "Corpus refreshed: {} messages, {} members",
                        engine.message_count(),
                        engine.member_count()
                    );
                    refresh_state.install_engine(engine).await;
                }
                Err(e) => {
                    error!("Corpus refresh failed: {}", e);
                }
            }
        }
    });

    server::run(state, &config.server.bind).await
}
