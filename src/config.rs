// Runtime configuration: command-line flags, each with an environment fallback

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::downloader::models::{EngineConfig, DEFAULT_USER_AGENT};
use crate::store::sweeper::DEFAULT_RETENTION;

#[derive(Debug, Clone, Parser)]
#[command(name = "youtube-converter", version, about = "Convert YouTube video IDs to webm/mp4 files")]
pub struct Config {
    /// Listening port
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "BIND_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Directory holding produced artifacts (served statically)
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Artifacts older than this are removed by /cleanup
    #[arg(long, env = "RETENTION_SECS", default_value_t = DEFAULT_RETENTION.as_secs())]
    pub retention_secs: u64,

    /// Run the sweeper on this interval; 0 disables it
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value_t = 0)]
    pub sweep_interval_secs: u64,

    /// yt-dlp binary; auto-detected when unset
    #[arg(long, env = "YTDLP_PATH")]
    pub ytdlp_path: Option<String>,

    /// Upper bound for one acquisition attempt
    #[arg(long, env = "ENGINE_TIMEOUT_SECS", default_value_t = 300)]
    pub engine_timeout_secs: u64,

    /// Proxy forwarded to both engines (e.g. socks5://127.0.0.1:1080)
    #[arg(long, env = "PROXY")]
    pub proxy: Option<String>,

    /// Resolution ceiling for mp4 downloads
    #[arg(long, env = "MAX_VIDEO_HEIGHT", default_value_t = 480)]
    pub max_video_height: u32,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    /// Strategy settings; `ytdlp_path` is the resolved binary
    pub fn engine_config(&self, ytdlp_path: String) -> EngineConfig {
        EngineConfig {
            ytdlp_path,
            timeout_secs: self.engine_timeout_secs,
            proxy: self.proxy.clone(),
            max_video_height: self.max_video_height,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["youtube-converter"]).unwrap();
        assert_eq!(config.retention(), Duration::from_secs(3600));
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.max_video_height, 480);
        assert!(config.sweep_interval().is_none());
    }

    #[test]
    fn test_flags_override() {
        let config = Config::try_parse_from([
            "youtube-converter",
            "--port",
            "8080",
            "--public-dir",
            "/tmp/media",
            "--sweep-interval-secs",
            "600",
            "--proxy",
            "socks5://127.0.0.1:1080",
        ])
        .unwrap();
        assert_eq!(config.listen_addr().port(), 8080);
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(600)));

        let engine = config.engine_config("/usr/bin/yt-dlp".to_string());
        assert_eq!(engine.ytdlp_path, "/usr/bin/yt-dlp");
        assert_eq!(engine.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }
}
