//! Configuration settings for the transcript service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub youtube: YoutubeSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// YouTube transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Base URL of the YouTube frontend.
    pub base_url: String,
    /// Transcript languages in order of preference.
    pub languages: Vec<String>,
    /// Timeout for each outbound request.
    pub timeout_seconds: u64,
    /// Value sent as the Accept-Language header.
    pub accept_language: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".to_string(),
            languages: vec!["en".to_string()],
            timeout_seconds: 30,
            accept_language: "en-US".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => Self::expand_path(&p.to_string_lossy()),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TranscriptError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("yt-transcript-api")
            .join("config.toml")
    }

    /// Resolve an explicit config path (with ~ expanded), or the default location.
    pub fn resolve_path(path: Option<&str>) -> PathBuf {
        match path {
            Some(p) => Self::expand_path(p),
            None => Self::default_config_path(),
        }
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.youtube.languages.is_empty() {
            return Err(crate::error::TranscriptError::Config(
                "youtube.languages must name at least one language".to_string(),
            ));
        }
        if self.youtube.timeout_seconds == 0 {
            return Err(crate::error::TranscriptError::Config(
                "youtube.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.youtube.base_url).map_err(|e| {
            crate::error::TranscriptError::Config(format!(
                "youtube.base_url is not a valid URL: {}",
                e
            ))
        })?;
        Ok(())
    }
}
