// Identifier validation - runs before any network or filesystem activity

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref LOCATOR_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();
}

/// Check that a locator is exactly 11 characters of `[A-Za-z0-9_-]`
pub fn is_valid_locator(locator: &str) -> bool {
    LOCATOR_RE.is_match(locator)
}

/// A locator that has passed validation.
///
/// Only obtainable through [`Locator::parse`], so anything holding one may
/// build URLs and file names from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn parse(raw: &str) -> Option<Self> {
        is_valid_locator(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_real_ids() {
        for id in ["dQw4w9WgXcQ", "a-b_c-d_e-f", "___________", "01234567890"] {
            assert!(is_valid_locator(id), "{}", id);
        }
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(!is_valid_locator(""));
        assert!(!is_valid_locator("short"));
        assert!(!is_valid_locator("dQw4w9WgXcQx"));
    }

    #[test]
    fn test_rejects_bad_characters() {
        for id in ["dQw4w9WgXc!", "dQw4w9 gXcQ", "../../etc/p", "dQw4w9WgXc.", "dQw4w9WgXcé"] {
            assert!(!is_valid_locator(id), "{}", id);
        }
    }

    #[test]
    fn test_rejects_trailing_newline() {
        assert!(!is_valid_locator("dQw4w9WgXcQ\n"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Locator::parse("dQw4w9WgXcQ").map(|l| l.to_string()), Some("dQw4w9WgXcQ".to_string()));
        assert!(Locator::parse("short").is_none());
    }
}
