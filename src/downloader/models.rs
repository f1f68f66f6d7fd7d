// Common data models for the converter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use super::errors::ErrorCategory;
use super::validator::Locator;

/// Output container requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    /// Video capped at a modest resolution
    Mp4,
    /// Best audio-only stream (default container)
    #[default]
    Webm,
}

impl MediaFormat {
    /// Resolve a format hint. Only the literal `mp4` selects video;
    /// anything else, including no hint at all, falls back to `webm`.
    pub fn normalize(hint: Option<&str>) -> Self {
        match hint {
            Some("mp4") => Self::Mp4,
            _ => Self::Webm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }

    pub fn is_audio_only(&self) -> bool {
        matches!(self, Self::Webm)
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound conversion request, built per call
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub locator: String,
    pub format_hint: Option<String>,
}

impl ConversionRequest {
    pub fn new(locator: impl Into<String>, format_hint: Option<&str>) -> Self {
        Self {
            locator: locator.into(),
            format_hint: format_hint.map(str::to_string),
        }
    }
}

/// Fully-qualified watch URL for a validated locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalSource(String);

impl CanonicalSource {
    pub fn from_locator(locator: &Locator) -> Self {
        Self(format!("https://www.youtube.com/watch?v={}", locator))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic artifact file name for `(locator, format)`
pub fn artifact_filename(locator: &Locator, format: MediaFormat) -> String {
    format!("{}.{}", locator, format)
}

/// A file in the Artifact Store
#[derive(Debug, Clone)]
pub struct Artifact {
    /// File stem (the locator for files this service produced)
    pub locator: String,
    /// File extension
    pub format: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Last write time; overwriting an artifact refreshes it
    pub created_at: SystemTime,
}

/// Outcome of a conversion, handed back to the HTTP boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub ok: bool,
    pub artifact_link: Option<String>,
    pub display_title: Option<String>,
    pub format: MediaFormat,
    pub error_category: Option<ErrorCategory>,
}

impl ConversionResult {
    pub fn success(locator: &Locator, format: MediaFormat) -> Self {
        Self {
            ok: true,
            artifact_link: Some(format!("/{}", artifact_filename(locator, format))),
            display_title: Some(locator.to_string()),
            format,
            error_category: None,
        }
    }

    pub fn failure(category: ErrorCategory, format: MediaFormat) -> Self {
        Self {
            ok: false,
            artifact_link: None,
            display_title: None,
            format,
            error_category: Some(category),
        }
    }

    /// User-facing message; empty on success
    pub fn message(&self) -> &'static str {
        self.error_category.map(|c| c.message()).unwrap_or("")
    }
}

/// Settings shared by every acquisition strategy
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// yt-dlp binary
    pub ytdlp_path: String,
    /// Upper bound for a single attempt, in seconds
    pub timeout_secs: u64,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Resolution ceiling for mp4
    pub max_video_height: u32,
    /// Client identity presented to the remote service
    pub user_agent: String,
}

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            timeout_secs: 300,
            proxy: None,
            max_video_height: 480,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_only_mp4_literal() {
        assert_eq!(MediaFormat::normalize(Some("mp4")), MediaFormat::Mp4);
        for hint in [None, Some(""), Some("webm"), Some("MP4"), Some("mp3"), Some(" mp4")] {
            assert_eq!(MediaFormat::normalize(hint), MediaFormat::Webm, "{:?}", hint);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for hint in [None, Some("mp4"), Some("webm"), Some("avi")] {
            let once = MediaFormat::normalize(hint);
            let twice = MediaFormat::normalize(Some(once.as_str()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_canonical_source_and_filename() {
        let locator = Locator::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(
            CanonicalSource::from_locator(&locator).as_str(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(artifact_filename(&locator, MediaFormat::Mp4), "dQw4w9WgXcQ.mp4");
    }

    #[test]
    fn test_success_result() {
        let locator = Locator::parse("dQw4w9WgXcQ").unwrap();
        let result = ConversionResult::success(&locator, MediaFormat::Webm);
        assert!(result.ok);
        assert_eq!(result.artifact_link.as_deref(), Some("/dQw4w9WgXcQ.webm"));
        assert_eq!(result.display_title.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(result.message(), "");
    }

    #[test]
    fn test_result_json_shape() {
        let result = ConversionResult::failure(ErrorCategory::NotFound, MediaFormat::Mp4);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["format"], "mp4");
        assert_eq!(json["errorCategory"], "NotFound");
        assert!(json["artifactLink"].is_null());
    }
}
