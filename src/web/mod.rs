// Web server: Axum-based JSON API over the quiz scorer.
//
// The catalog is loaded once at startup and shared read-only with every
// handler. Scoring is pure in-memory work, so handlers need no locking.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::quiz::catalog::QuestionCatalog;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<QuestionCatalog>,
    /// K used when a request doesn't send `top_k`
    pub default_top_k: usize,
}

impl AppState {
    pub fn new(catalog: QuestionCatalog, default_top_k: usize) -> Self {
        Self {
            catalog: Arc::new(catalog),
            default_top_k,
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Style quiz API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::status::index))
        .route("/healthz", get(handlers::status::healthz))
        .route("/api/questions", get(handlers::questions::list_questions))
        .route("/api/profile", post(handlers::profile::score_answers))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST, axum::http::Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
