//! YouTube transcript provider.
//!
//! Retrieval happens in three hops: the watch page yields the innertube API
//! key, the innertube player endpoint yields playability and caption tracks,
//! and the chosen track's timedtext URL yields the caption XML.

use super::{TimedTextParser, TranscriptEntry, TranscriptProvider};
use crate::config::YoutubeSettings;
use crate::error::{Result, TranscriptError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Innertube client identity used for the player request.
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

// Response types for the innertube player endpoint

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    tracklist: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

/// A caption track offered for a video.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    /// Language code (e.g., "en", "de").
    pub language_code: String,
    /// Display name (e.g., "English (auto-generated)").
    pub name: String,
    /// Timedtext URL for the track.
    pub base_url: String,
    /// Whether the track is speech-recognized rather than uploaded.
    pub is_generated: bool,
}

impl From<RawCaptionTrack> for CaptionTrack {
    fn from(raw: RawCaptionTrack) -> Self {
        let name = raw
            .name
            .and_then(|n| {
                n.simple_text.or_else(|| {
                    n.runs
                        .and_then(|runs| runs.into_iter().next())
                        .map(|run| run.text)
                })
            })
            .unwrap_or_else(|| raw.language_code.clone());

        Self {
            // srv3 carries per-word timing we don't use; the default format is plain timedtext.
            base_url: raw.base_url.replace("&fmt=srv3", ""),
            is_generated: raw.kind.as_deref() == Some("asr"),
            language_code: raw.language_code,
            name,
        }
    }
}

/// Transcript provider backed by YouTube.
pub struct YoutubeTranscriptProvider {
    client: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
    accept_language: String,
    api_key_regex: Regex,
    consent_regex: Regex,
    parser: TimedTextParser,
}

impl YoutubeTranscriptProvider {
    /// Create a provider from YouTube settings.
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        let api_key_regex =
            Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex");
        let consent_regex = Regex::new(r#"name="v" value="([^"]*)""#).expect("Invalid regex");

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            languages: settings.languages.clone(),
            accept_language: settings.accept_language.clone(),
            api_key_regex,
            consent_regex,
            parser: TimedTextParser::new(),
        })
    }

    /// Fetch the watch page HTML, accepting the cookie consent wall once if shown.
    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let html = self.get_watch_page(video_id, None).await?;

        if !html.contains("action=\"https://consent.youtube.com/s\"") {
            return Ok(html);
        }

        debug!("Consent page shown, retrying with consent cookie");
        let consent_value = self
            .consent_regex
            .captures(&html)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| TranscriptError::Parse("Failed to create consent cookie".to_string()))?;

        let html = self
            .get_watch_page(video_id, Some(format!("CONSENT=YES+{}", consent_value)))
            .await?;

        if html.contains("action=\"https://consent.youtube.com/s\"") {
            return Err(TranscriptError::Parse(
                "Consent cookie was not accepted".to_string(),
            ));
        }

        Ok(html)
    }

    async fn get_watch_page(&self, video_id: &str, cookie: Option<String>) -> Result<String> {
        let mut request = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header(ACCEPT_LANGUAGE, &self.accept_language);

        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let html = request.send().await?.error_for_status()?.text().await?;
        Ok(html)
    }

    /// Extract the innertube API key embedded in the watch page.
    fn extract_api_key(&self, html: &str) -> Result<String> {
        if let Some(caps) = self.api_key_regex.captures(html) {
            return Ok(caps[1].to_string());
        }

        if html.contains("class=\"g-recaptcha\"") {
            return Err(TranscriptError::RequestBlocked);
        }

        Err(TranscriptError::Parse(
            "INNERTUBE_API_KEY not found in watch page".to_string(),
        ))
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptError::RequestBlocked);
        }

        let text = response.error_for_status()?.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| TranscriptError::Parse(format!("Invalid player response: {}", e)))
    }

    /// Map the player's playability status onto an error, if any.
    fn check_playability(video_id: &str, status: Option<&PlayabilityStatus>) -> Result<()> {
        let Some(status) = status else {
            return Ok(());
        };

        let code = status.status.as_deref().unwrap_or("OK");
        if code == "OK" {
            return Ok(());
        }

        let reason = status.reason.clone().unwrap_or_default();
        let lowered = reason.to_lowercase();

        match code {
            "LOGIN_REQUIRED" if lowered.contains("not a bot") => Err(TranscriptError::RequestBlocked),
            "LOGIN_REQUIRED" if lowered.contains("inappropriate") => {
                Err(TranscriptError::AgeRestricted)
            }
            "ERROR" if lowered.contains("unavailable") => {
                if video_id.starts_with("http://") || video_id.starts_with("https://") {
                    Err(TranscriptError::InvalidVideoId(video_id.to_string()))
                } else {
                    Err(TranscriptError::VideoUnavailable)
                }
            }
            _ if reason.is_empty() => Err(TranscriptError::VideoUnplayable(code.to_string())),
            _ => Err(TranscriptError::VideoUnplayable(reason)),
        }
    }

    /// Collect the caption tracks advertised by the player response.
    fn caption_tracks(player: PlayerResponse) -> Result<Vec<CaptionTrack>> {
        let tracks: Vec<CaptionTrack> = player
            .captions
            .and_then(|c| c.tracklist)
            .map(|t| t.caption_tracks)
            .unwrap_or_default()
            .into_iter()
            .map(CaptionTrack::from)
            .collect();

        if tracks.is_empty() {
            return Err(TranscriptError::TranscriptsDisabled);
        }

        Ok(tracks)
    }

    /// Pick a track by language preference, uploaded tracks before generated ones.
    pub fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> Result<&'a CaptionTrack> {
        for language in &self.languages {
            let manual = tracks
                .iter()
                .find(|t| !t.is_generated && &t.language_code == language);
            let generated = tracks
                .iter()
                .find(|t| t.is_generated && &t.language_code == language);

            if let Some(track) = manual.or(generated) {
                return Ok(track);
            }
        }

        Err(TranscriptError::NoTranscriptFound {
            requested: self.languages.join(", "),
            available: tracks
                .iter()
                .map(|t| format!("{} (\"{}\")", t.language_code, t.name))
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    async fn fetch_timedtext(&self, track: &CaptionTrack) -> Result<Vec<TranscriptEntry>> {
        // Tracks behind the xpe experiment answer with an empty body unless a PO token is sent.
        if track.base_url.contains("&exp=xpe") {
            return Err(TranscriptError::PoTokenRequired);
        }

        let xml = self
            .client
            .get(&track.base_url)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        self.parser.parse(&xml).inspect_err(|e| {
            warn!("Timedtext for {} could not be parsed: {}", track.language_code, e)
        })
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    #[instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        if video_id.starts_with("http://") || video_id.starts_with("https://") {
            return Err(TranscriptError::InvalidVideoId(video_id.to_string()));
        }

        let html = self.fetch_watch_page(video_id).await?;
        let api_key = self.extract_api_key(&html)?;
        debug!("Found innertube API key");

        let player = self.fetch_player(video_id, &api_key).await?;
        Self::check_playability(video_id, player.playability_status.as_ref())?;

        let tracks = Self::caption_tracks(player)?;
        debug!("Video offers {} caption tracks", tracks.len());

        let track = self.select_track(&tracks)?;
        debug!(
            "Selected track {} (generated: {})",
            track.language_code, track.is_generated
        );

        let entries = self.fetch_timedtext(track).await?;
        debug!("Parsed {} transcript entries", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(languages: &[&str]) -> YoutubeTranscriptProvider {
        let settings = YoutubeSettings {
            languages: languages.iter().map(|l| l.to_string()).collect(),
            ..YoutubeSettings::default()
        };
        YoutubeTranscriptProvider::new(&settings).unwrap()
    }

    fn track(language_code: &str, is_generated: bool) -> CaptionTrack {
        CaptionTrack {
            language_code: language_code.to_string(),
            name: language_code.to_string(),
            base_url: format!("https://example.com/{}", language_code),
            is_generated,
        }
    }

    fn status(code: &str, reason: Option<&str>) -> PlayabilityStatus {
        PlayabilityStatus {
            status: Some(code.to_string()),
            reason: reason.map(|r| r.to_string()),
        }
    }

    #[test]
    fn test_select_prefers_manual_track() {
        let provider = provider(&["en"]);
        let tracks = vec![track("en", true), track("en", false)];

        let selected = provider.select_track(&tracks).unwrap();
        assert!(!selected.is_generated);
    }

    #[test]
    fn test_select_falls_back_to_generated() {
        let provider = provider(&["en"]);
        let tracks = vec![track("de", false), track("en", true)];

        let selected = provider.select_track(&tracks).unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(selected.is_generated);
    }

    #[test]
    fn test_select_follows_language_order() {
        let provider = provider(&["fr", "de", "en"]);
        let tracks = vec![track("en", false), track("de", true)];

        let selected = provider.select_track(&tracks).unwrap();
        assert_eq!(selected.language_code, "de");
    }

    #[test]
    fn test_select_without_match() {
        let provider = provider(&["en"]);
        let tracks = vec![track("es", false)];

        let err = provider.select_track(&tracks).unwrap_err();
        assert!(err.is_transcript_unavailable());
        assert!(err.to_string().contains("es"));
    }

    #[test]
    fn test_playability_mapping() {
        assert!(YoutubeTranscriptProvider::check_playability("abc", None).is_ok());
        assert!(
            YoutubeTranscriptProvider::check_playability("abc", Some(&status("OK", None))).is_ok()
        );

        let err = YoutubeTranscriptProvider::check_playability(
            "abc",
            Some(&status("ERROR", Some("This video is unavailable"))),
        )
        .unwrap_err();
        assert!(matches!(err, TranscriptError::VideoUnavailable));

        let err = YoutubeTranscriptProvider::check_playability(
            "abc",
            Some(&status("LOGIN_REQUIRED", Some("Sign in to confirm you're not a bot"))),
        )
        .unwrap_err();
        assert!(matches!(err, TranscriptError::RequestBlocked));

        let err = YoutubeTranscriptProvider::check_playability(
            "abc",
            Some(&status(
                "LOGIN_REQUIRED",
                Some("This video may be inappropriate for some users."),
            )),
        )
        .unwrap_err();
        assert!(matches!(err, TranscriptError::AgeRestricted));

        let err = YoutubeTranscriptProvider::check_playability(
            "abc",
            Some(&status("UNPLAYABLE", Some("Private video"))),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Video is unplayable: Private video");
    }

    #[test]
    fn test_caption_tracks_missing_means_disabled() {
        let player: PlayerResponse =
            serde_json::from_str(r#"{"playabilityStatus": {"status": "OK"}}"#).unwrap();

        let err = YoutubeTranscriptProvider::caption_tracks(player).unwrap_err();
        assert!(matches!(err, TranscriptError::TranscriptsDisabled));
    }

    #[test]
    fn test_caption_track_conversion() {
        let player: PlayerResponse = serde_json::from_str(
            r#"{
                "captions": {
                    "playerCaptionsTracklistRenderer": {
                        "captionTracks": [
                            {
                                "baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=en&fmt=srv3",
                                "languageCode": "en",
                                "name": {"runs": [{"text": "English (auto-generated)"}]},
                                "kind": "asr"
                            },
                            {
                                "baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=de",
                                "languageCode": "de",
                                "name": {"simpleText": "German"}
                            }
                        ]
                    }
                }
            }"#,
        )
        .unwrap();

        let tracks = YoutubeTranscriptProvider::caption_tracks(player).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(
            tracks[0].base_url,
            "https://www.youtube.com/api/timedtext?v=x&lang=en"
        );
        assert!(tracks[0].is_generated);
        assert_eq!(tracks[0].name, "English (auto-generated)");
        assert_eq!(tracks[1].name, "German");
        assert!(!tracks[1].is_generated);
    }

    #[test]
    fn test_extract_api_key() {
        let provider = provider(&["en"]);

        let key = provider
            .extract_api_key(r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaTest_key-1"});</script>"#)
            .unwrap();
        assert_eq!(key, "AIzaTest_key-1");

        let err = provider
            .extract_api_key(r#"<div class="g-recaptcha"></div>"#)
            .unwrap_err();
        assert!(matches!(err, TranscriptError::RequestBlocked));

        let err = provider.extract_api_key("<html></html>").unwrap_err();
        assert!(matches!(err, TranscriptError::Parse(_)));
    }

    #[tokio::test]
    async fn test_url_video_id_rejected_without_network() {
        let provider = provider(&["en"]);

        let err = provider
            .fetch_transcript("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptError::InvalidVideoId(_)));
    }
}
