//! yt-transcript-api - YouTube transcripts over HTTP
//!
//! A small service exposing `GET /transcript?video_id=<id>`. It fetches the
//! video's captions from YouTube and answers with a JSON envelope:
//!
//! - `{"success": true, "transcript": "<lines joined by \n>"}`
//! - `{"success": false, "error": "<message>"}`
//!
//! Both outcomes are returned with HTTP 200.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `provider` - Transcript retrieval (YouTube) and outcome classification
//! - `api` - Axum router, handlers and response envelopes
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use yt_transcript_api::config::Settings;
//! use yt_transcript_api::provider::YoutubeTranscriptProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let provider = Arc::new(YoutubeTranscriptProvider::new(&settings.youtube)?);
//!
//!     let app = yt_transcript_api::api::router(provider);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod provider;

pub use error::{Result, TranscriptError};
