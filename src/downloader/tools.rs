// Engine binary discovery and version reporting

use serde::Serialize;
use std::process::Command;

/// Availability of the yt-dlp engine, reported by /health
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "available")]
    pub is_available: bool,
}

pub struct ToolManager;

impl ToolManager {
    pub fn new() -> Self {
        Self
    }

    /// Locate yt-dlp, honouring an explicit path when one is configured
    pub fn detect_ytdlp(&self, configured: Option<&str>) -> ToolInfo {
        let path = match configured {
            Some(p) => Some(p.to_string()),
            None => self.find_binary("yt-dlp"),
        };
        let version = path.as_deref().and_then(|p| self.get_version(p));

        ToolInfo {
            name: "yt-dlp".to_string(),
            is_available: version.is_some(),
            version,
            path,
        }
    }

    fn find_binary(&self, binary_name: &str) -> Option<String> {
        // 1. Try common paths first
        let common_paths = [
            format!("/opt/homebrew/bin/{}", binary_name),
            format!("/usr/local/bin/{}", binary_name),
            format!("/usr/bin/{}", binary_name),
        ];

        for path in common_paths {
            if std::path::Path::new(&path).exists() {
                return Some(path);
            }
        }

        // 2. Try PATH
        match Command::new("which").arg(binary_name).output() {
            Ok(output) if output.status.success() => {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                (!path.is_empty()).then_some(path)
            }
            _ => None,
        }
    }

    fn get_version(&self, path: &str) -> Option<String> {
        match Command::new(path).arg("--version").output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            _ => None,
        }
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_binary_is_unavailable() {
        let info = ToolManager::new().detect_ytdlp(Some("/nonexistent/yt-dlp"));
        assert_eq!(info.path.as_deref(), Some("/nonexistent/yt-dlp"));
        assert!(!info.is_available);
        assert!(info.version.is_none());
    }
}
