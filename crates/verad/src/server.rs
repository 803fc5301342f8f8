//! HTTP server for verad.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use vera_common::AnswerEngine;

use crate::routes;

/// Application state shared across handlers.
///
/// The engine slot holds the current corpus snapshot; `None` means the
/// upstream has never delivered a usable corpus. Handlers only ever
/// read the slot, and the refresh task replaces the whole Arc, so a
/// request in flight keeps its snapshot for the full computation.
pub struct AppState {
    pub engine: RwLock<Option<Arc<AnswerEngine>>>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            engine: RwLock::new(None),
            start_time: Instant::now(),
        }
    }

    /// Swap in a freshly built snapshot.
    pub async fn install_engine(&self, engine: AnswerEngine) {
        let mut slot = self.engine.write().await;
        *slot = Some(Arc::new(engine));
    }

    /// Current snapshot, if the corpus has ever loaded.
    pub async fn current_engine(&self) -> Option<Arc<AnswerEngine>> {
        self.engine.read().await.clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the HTTP server until the process is stopped.
pub async fn run(state: Arc<AppState>, bind: &str) -> Result<()> {
    let app = Router::new()
        .merge(routes::ask_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("  Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
