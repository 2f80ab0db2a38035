pub mod handlers;
pub mod templates;
mod types;
pub mod uploads;

use crate::{
    Result,
    config::Config,
    inference::HttpInferenceClient,
    ocr::TesseractEngine,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use handlers::AppState;

/// Builds the router over an existing state. Exposed for tests.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/process", post(handlers::process_text))
        .route("/upload", post(handlers::upload))
        .route("/clean", post(handlers::clean))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let config = Arc::new(config);

    if config.inference.validated_api_key().is_err() {
        warn!("No model access key configured; cleaning requests will be rejected");
    }

    let app_state = AppState {
        inference: Arc::new(HttpInferenceClient::new(config.inference.clone())),
        ocr: Arc::new(TesseractEngine::from_config(&config.ocr)),
        config: config.clone(),
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
