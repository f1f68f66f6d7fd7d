// Error types for acquisition strategies and user-facing failure categories

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::diagnostics::diagnose_error;

/// Error reported by an acquisition strategy.
///
/// Engines only speak free text, so the raw output is classified once,
/// here at the strategy boundary, and everything downstream matches on
/// the variant instead of the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Private video or sign-in required
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Video deleted, unavailable or never existed
    #[error("Video not found: {0}")]
    NotFound(String),

    /// Video exceeds the engine's duration limit
    #[error("Video too long: {0}")]
    TooLong(String),

    /// Blocked on copyright grounds
    #[error("Copyright restricted: {0}")]
    CopyrightBlocked(String),

    /// Engine binary missing or not executable
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Attempt exceeded the configured timeout
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// Engine finished but produced nothing usable
    #[error("Empty output: {0}")]
    EmptyOutput(String),

    /// Local I/O failure while writing the artifact
    #[error("I/O error: {0}")]
    Io(String),

    /// Anything the patterns do not recognise
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl EngineError {
    /// Classify raw engine output (stderr, HTTP error text, ...) into a variant.
    pub fn from_engine_output(output: &str) -> Self {
        diagnose_error(output)
    }
}

// Engines hand back stderr as a String; classify on conversion
impl From<String> for EngineError {
    fn from(s: String) -> Self {
        Self::from_engine_output(&s)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Unknown(format!("stream timed out: {}", e));
        }
        match e.status() {
            Some(status) if status == reqwest::StatusCode::NOT_FOUND => {
                Self::NotFound(e.to_string())
            }
            _ => Self::from_engine_output(&e.to_string()),
        }
    }
}

/// User-facing failure categories returned by the orchestrator.
///
/// Each category carries a fixed message; raw engine text never reaches
/// the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    MissingInput,
    InvalidFormat,
    PrivateOrAuthRequired,
    NotFound,
    TooLong,
    CopyrightRestricted,
    EmptyOrMissingOutput,
    GenericDownloadError,
}

impl ErrorCategory {
    /// Stable human-readable message for this category
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingInput => "Please enter a valid YouTube Video ID.",
            Self::InvalidFormat => {
                "Invalid Video ID format. A YouTube Video ID is 11 characters \
                 (letters, numbers, - and _)."
            }
            Self::PrivateOrAuthRequired => "This video is private or requires sign-in.",
            Self::NotFound => "Video not found or unavailable.",
            Self::TooLong => "This video is too long to convert.",
            Self::CopyrightRestricted => "This video is blocked due to copyright restrictions.",
            Self::EmptyOrMissingOutput => {
                "The download finished but produced no file. Please try again."
            }
            Self::GenericDownloadError => {
                "Error downloading video. Make sure the Video ID is correct."
            }
        }
    }
}

impl From<&EngineError> for ErrorCategory {
    fn from(e: &EngineError) -> Self {
        match e {
            EngineError::AuthRequired(_) => Self::PrivateOrAuthRequired,
            EngineError::NotFound(_) => Self::NotFound,
            EngineError::TooLong(_) => Self::TooLong,
            EngineError::CopyrightBlocked(_) => Self::CopyrightRestricted,
            EngineError::EmptyOutput(_) => Self::EmptyOrMissingOutput,
            EngineError::ToolNotFound(_)
            | EngineError::Timeout(_)
            | EngineError::Io(_)
            | EngineError::Unknown(_) => Self::GenericDownloadError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion_classifies() {
        let e: EngineError = "ERROR: [youtube] abc: Private video".to_string().into();
        assert!(matches!(e, EngineError::AuthRequired(_)));
    }

    #[test]
    fn test_every_engine_error_has_category() {
        let cases = [
            (EngineError::AuthRequired(String::new()), ErrorCategory::PrivateOrAuthRequired),
            (EngineError::NotFound(String::new()), ErrorCategory::NotFound),
            (EngineError::TooLong(String::new()), ErrorCategory::TooLong),
            (EngineError::CopyrightBlocked(String::new()), ErrorCategory::CopyrightRestricted),
            (EngineError::EmptyOutput(String::new()), ErrorCategory::EmptyOrMissingOutput),
            (EngineError::Timeout(30), ErrorCategory::GenericDownloadError),
            (EngineError::ToolNotFound(String::new()), ErrorCategory::GenericDownloadError),
            (EngineError::Unknown(String::new()), ErrorCategory::GenericDownloadError),
        ];
        for (error, expected) in cases {
            assert_eq!(ErrorCategory::from(&error), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_messages_do_not_leak_engine_text() {
        let e = EngineError::Unknown("ERROR: secret stderr".to_string());
        let message = ErrorCategory::from(&e).message();
        assert!(!message.contains("secret stderr"));
    }

    #[test]
    fn test_category_serializes_by_name() {
        let json = serde_json::to_string(&ErrorCategory::PrivateOrAuthRequired).unwrap();
        assert_eq!(json, "\"PrivateOrAuthRequired\"");
    }
}
