//! HTTP API.
//!
//! Routes:
//! - `GET /transcript?video_id=<id>` returns a [`TranscriptResponse`] envelope
//! - `GET /health` returns `{"status": "ok"}`
//!
//! Cross-origin requests are allowed from any origin, with any method and header.

mod handlers;
mod response;

pub use handlers::TranscriptQuery;
pub use response::{ErrorResponse, TranscriptResponse, NO_TRANSCRIPT_MESSAGE};

use crate::provider::TranscriptProvider;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
pub struct AppState {
    pub provider: Arc<dyn TranscriptProvider>,
}

/// Build the application router around a transcript provider.
pub fn router(provider: Arc<dyn TranscriptProvider>) -> Router {
    let state = Arc::new(AppState { provider });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/transcript", get(handlers::get_transcript))
        .layer(cors)
        .with_state(state)
}
