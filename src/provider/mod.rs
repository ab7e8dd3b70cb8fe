//! Transcript provider abstraction.
//!
//! A provider turns a video identifier into an ordered list of timed
//! transcript entries. The only production provider talks to YouTube;
//! tests substitute their own.

mod outcome;
mod timedtext;
mod youtube;

pub use outcome::{fetch_outcome, FetchOutcome};
pub use timedtext::TimedTextParser;
pub use youtube::{CaptionTrack, YoutubeTranscriptProvider};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One timed caption segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Caption text for the segment.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Join entry texts with a newline, keeping provider order.
pub fn transcript_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trait for transcript retrieval services.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the default transcript for a video.
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>>;
}
