//! HTTP service for Ayulink medical document OCR.
//!
//! Accepts PDF and JPEG uploads, runs them through the core document
//! pipeline, persists `<name>_ocr.json` results and serves both back.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{router, UploadResponse};
pub use state::AppState;

use ayulink_core::models::config::ServerConfig;
use tokio::signal;

/// Bind to the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, config: &ServerConfig) -> std::io::Result<()> {
    let app = router(state, config.max_upload_bytes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Ayulink OCR service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
