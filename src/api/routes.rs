//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use super::types::{AskRequest, HealthResponse};
use super::ui::INDEX_HTML;
use crate::config::Config;
use crate::harness::{Harness, Submission};
use crate::startup::Components;
use crate::tools::{ToolInfo, ToolRegistry};

/// Shared application state.
pub struct AppState {
    pub harness: Arc<Harness>,
    pub tools: Arc<ToolRegistry>,
    pub source_url: String,
    pub chunk_count: usize,
}

impl From<Components> for AppState {
    fn from(components: Components) -> Self {
        Self {
            harness: components.harness,
            tools: components.tools,
            source_url: components.source_url,
            chunk_count: components.chunk_count,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/ask", post(ask))
        .route("/api/tools", get(list_tools))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and serve until the process exits.
pub async fn serve(config: &Config, state: AppState) -> std::io::Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> (StatusCode, Json<Submission>) {
    let submission = state.harness.submit(&req.question).await;
    let status = match submission {
        Submission::Failed { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Json(submission))
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Json<Vec<ToolInfo>> {
    Json(state.tools.list_tools())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.source_url.clone(),
        chunks: state.chunk_count,
    })
}
