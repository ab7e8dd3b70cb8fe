//! Fetch command - retrieve one transcript without starting the server.

use crate::api::TranscriptResponse;
use crate::cli::Output;
use crate::config::Settings;
use crate::provider::{fetch_outcome, YoutubeTranscriptProvider};

/// Run the fetch command.
pub async fn run_fetch(video_id: &str, json: bool, settings: Settings) -> anyhow::Result<()> {
    let provider = YoutubeTranscriptProvider::new(&settings.youtube)?;

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let outcome = fetch_outcome(&provider, video_id).await;
    spinner.finish_and_clear();

    let response = TranscriptResponse::from(outcome);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if let Some(transcript) = &response.transcript {
        println!("{}", transcript);
    }

    if !response.success {
        if let (false, Some(error)) = (json, &response.error) {
            Output::error(error);
        }
        anyhow::bail!("Transcript fetch failed for {}", video_id);
    }

    Ok(())
}
