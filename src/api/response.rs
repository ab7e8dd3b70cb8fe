//! Response envelopes.

use crate::provider::{transcript_text, FetchOutcome};
use serde::{Deserialize, Serialize};

/// Message returned when a video has no usable transcript.
pub const NO_TRANSCRIPT_MESSAGE: &str = "No transcript available for this video";

/// Envelope returned by `GET /transcript`.
///
/// Callers distinguish outcomes by `success`; the HTTP status is 200 either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranscriptResponse {
    pub fn ok(transcript: String) -> Self {
        Self {
            success: true,
            transcript: Some(transcript),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            transcript: None,
            error: Some(error.into()),
        }
    }
}

impl From<FetchOutcome> for TranscriptResponse {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Success(entries) => Self::ok(transcript_text(&entries)),
            FetchOutcome::NoTranscriptAvailable => Self::failure(NO_TRANSCRIPT_MESSAGE),
            FetchOutcome::OtherFailure(message) => Self::failure(message),
        }
    }
}

/// Body for requests rejected before reaching a handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
