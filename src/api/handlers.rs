//! Request handlers.

use super::response::{ErrorResponse, TranscriptResponse};
use super::AppState;
use crate::provider::{fetch_outcome, FetchOutcome};
use axum::{
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Query string of `GET /transcript`.
#[derive(Debug, Deserialize)]
pub struct TranscriptQuery {
    /// YouTube video ID
    pub video_id: String,
}

impl<S> FromRequestParts<S> for TranscriptQuery
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<TranscriptQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorResponse {
                        error: rejection.body_text(),
                    }),
                )
            })?;
        Ok(query)
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_transcript(
    State(state): State<Arc<AppState>>,
    query: TranscriptQuery,
) -> Json<TranscriptResponse> {
    let outcome = fetch_outcome(state.provider.as_ref(), &query.video_id).await;

    match &outcome {
        FetchOutcome::Success(entries) => {
            info!(video_id = %query.video_id, entries = entries.len(), "Transcript fetched")
        }
        FetchOutcome::NoTranscriptAvailable => {
            info!(video_id = %query.video_id, "No transcript available")
        }
        FetchOutcome::OtherFailure(message) => {
            warn!(video_id = %query.video_id, "Transcript fetch failed: {}", message)
        }
    }

    Json(TranscriptResponse::from(outcome))
}
