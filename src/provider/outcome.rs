//! Classification of provider results.

use super::{TranscriptEntry, TranscriptProvider};
use crate::error::Result;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error};

/// Result of a single provider call, as seen by the request handler.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The provider returned a transcript.
    Success(Vec<TranscriptEntry>),
    /// Transcripts are disabled, or none exist for the requested languages.
    NoTranscriptAvailable,
    /// Any other failure, carrying its message.
    OtherFailure(String),
}

impl From<Result<Vec<TranscriptEntry>>> for FetchOutcome {
    fn from(result: Result<Vec<TranscriptEntry>>) -> Self {
        match result {
            Ok(entries) => FetchOutcome::Success(entries),
            Err(e) if e.is_transcript_unavailable() => {
                debug!("No transcript available: {}", e);
                FetchOutcome::NoTranscriptAvailable
            }
            Err(e) => FetchOutcome::OtherFailure(e.to_string()),
        }
    }
}

/// Call the provider and classify the result.
///
/// A panic inside the provider is caught here and reported as
/// [`FetchOutcome::OtherFailure`].
pub async fn fetch_outcome(provider: &dyn TranscriptProvider, video_id: &str) -> FetchOutcome {
    match AssertUnwindSafe(provider.fetch_transcript(video_id))
        .catch_unwind()
        .await
    {
        Ok(result) => FetchOutcome::from(result),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("Transcript provider panicked: {}", message);
            FetchOutcome::OtherFailure(message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Transcript provider failed unexpectedly".to_string()
    }
}
