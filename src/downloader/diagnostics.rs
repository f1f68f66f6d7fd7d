// Engine error diagnostics - maps free-text engine output to EngineError
//
// yt-dlp and the stream fetcher only report failures as text. Patterns are
// checked in order; the first group that matches wins. The mapping is
// best-effort: engines reword their messages without notice.

use super::errors::EngineError;

const AUTH_PATTERNS: &[&str] = &[
    "private video",
    "video is private",
    "sign in",
    "sign-in",
    "login required",
    "members only",
];

const NOT_FOUND_PATTERNS: &[&str] = &[
    "not found",
    "unavailable",
    "404",
    "does not exist",
    "has been removed",
    "no longer available",
];

const TOO_LONG_PATTERNS: &[&str] = &["too long", "duration exceeds", "exceeds maximum duration"];

const COPYRIGHT_PATTERNS: &[&str] = &["copyright"];

/// Analyze engine output and return the matching error variant
pub fn diagnose_error(error: &str) -> EngineError {
    let lower = error.to_lowercase();
    let raw = first_error_line(error);

    if contains_any(&lower, AUTH_PATTERNS) {
        return EngineError::AuthRequired(raw);
    }

    if contains_any(&lower, NOT_FOUND_PATTERNS) {
        return EngineError::NotFound(raw);
    }

    if contains_any(&lower, TOO_LONG_PATTERNS) {
        return EngineError::TooLong(raw);
    }

    if contains_any(&lower, COPYRIGHT_PATTERNS) {
        return EngineError::CopyrightBlocked(raw);
    }

    if raw.is_empty() {
        return EngineError::Unknown("engine produced no error output".to_string());
    }

    EngineError::Unknown(raw)
}

/// Extract every known pattern present in the message (for logging)
pub fn matched_patterns(error: &str) -> Vec<&'static str> {
    let lower = error.to_lowercase();

    AUTH_PATTERNS
        .iter()
        .chain(NOT_FOUND_PATTERNS)
        .chain(TOO_LONG_PATTERNS)
        .chain(COPYRIGHT_PATTERNS)
        .copied()
        .filter(|p| lower.contains(p))
        .collect()
}

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}

/// Most useful single line of a multi-line stderr dump.
/// yt-dlp prefixes the fatal line with "ERROR:"; otherwise take the last non-empty line.
fn first_error_line(error: &str) -> String {
    error
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| error.lines().map(str::trim).filter(|l| !l.is_empty()).last())
        .unwrap_or("")
        .to_string()
}
