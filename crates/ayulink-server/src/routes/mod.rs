//! HTTP routes.

mod health;
mod results;
mod upload;

pub use upload::UploadResponse;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router with permissive CORS and request tracing.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .route("/upload", post(upload::upload_file))
        .route("/results/:filename", get(results::get_result))
        .route("/uploads/:filename", get(results::get_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
