//! Error types for the transcript service.

use thiserror::Error;

/// Library-level error type for transcript retrieval.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("No transcript found for any of the requested languages ({requested}). Available: {available}")]
    NoTranscriptFound { requested: String, available: String },

    #[error("Video unavailable")]
    VideoUnavailable,

    #[error("Invalid video id: {0}. Pass the video id, not the video URL")]
    InvalidVideoId(String),

    #[error("YouTube is blocking requests from this IP")]
    RequestBlocked,

    #[error("This video is age restricted and requires signing in")]
    AgeRestricted,

    #[error("Video is unplayable: {0}")]
    VideoUnplayable(String),

    #[error("The transcript for this video requires a PO token, which is not supported")]
    PoTokenRequired,

    #[error("Failed to parse YouTube response: {0}")]
    Parse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TranscriptError {
    /// Whether the video simply has no transcript to offer.
    pub fn is_transcript_unavailable(&self) -> bool {
        matches!(
            self,
            TranscriptError::TranscriptsDisabled | TranscriptError::NoTranscriptFound { .. }
        )
    }
}

/// Result type alias for transcript operations.
pub type Result<T> = std::result::Result<T, TranscriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_unavailable_classification() {
        assert!(TranscriptError::TranscriptsDisabled.is_transcript_unavailable());
        assert!(TranscriptError::NoTranscriptFound {
            requested: "en".to_string(),
            available: "de".to_string(),
        }
        .is_transcript_unavailable());

        assert!(!TranscriptError::VideoUnavailable.is_transcript_unavailable());
        assert!(!TranscriptError::Parse("bad".to_string()).is_transcript_unavailable());
        assert!(!TranscriptError::PoTokenRequired.is_transcript_unavailable());
    }

    #[test]
    fn test_video_unavailable_message() {
        assert_eq!(TranscriptError::VideoUnavailable.to_string(), "Video unavailable");
    }
}
