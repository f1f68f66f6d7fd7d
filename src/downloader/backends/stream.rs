// Fallback strategy: resolve a direct media URL, then copy the stream byte-for-byte
//
// Used when the primary yt-dlp download fails. Only one stream is fetched
// (audio-only, or a muxed audio+video stream), so nothing needs merging.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::downloader::errors::EngineError;
use crate::downloader::models::{CanonicalSource, EngineConfig, MediaFormat};
use crate::downloader::traits::AcquisitionStrategy;
use crate::downloader::utils::{network_args, output_error, run_output_with_timeout};

pub struct DirectStreamBackend {
    config: EngineConfig,
    client: reqwest::Client,
}

impl DirectStreamBackend {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(true);

        if let Some(proxy_url) = config.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| EngineError::Unknown(format!("Invalid proxy URL {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| EngineError::Unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Single-stream filter: audio-only for webm, muxed audio+video for mp4
    fn stream_filter(&self, format: MediaFormat) -> String {
        match format {
            MediaFormat::Webm => "bestaudio".to_string(),
            MediaFormat::Mp4 => format!(
                "best[height<={}][vcodec!=none][acodec!=none]/best[vcodec!=none][acodec!=none]/best",
                self.config.max_video_height
            ),
        }
    }

    async fn resolve_stream_url(
        &self,
        source: &CanonicalSource,
        format: MediaFormat,
    ) -> Result<String, EngineError> {
        let mut args = vec![
            "-g".to_string(),
            "-f".to_string(),
            self.stream_filter(format),
            "--no-playlist".to_string(),
            "--no-check-certificates".to_string(),
        ];
        args.extend(network_args(&self.config));
        args.push(source.to_string());

        let output =
            run_output_with_timeout(&self.config.ytdlp_path, &args, self.config.timeout_secs).await?;
        if !output.status.success() {
            return Err(output_error(&output));
        }

        first_url(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| EngineError::EmptyOutput("no stream URL resolved".to_string()))
    }

    async fn copy_stream(&self, stream_url: &str, destination: &Path) -> Result<u64, EngineError> {
        let mut response = self.client.get(stream_url).send().await?.error_for_status()?;

        let mut file = tokio::fs::File::create(destination).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[async_trait]
impl AcquisitionStrategy for DirectStreamBackend {
    fn name(&self) -> &'static str {
        "direct-stream"
    }

    async fn attempt(
        &self,
        source: &CanonicalSource,
        format: MediaFormat,
        destination: &Path,
    ) -> Result<(), EngineError> {
        let stream_url = self.resolve_stream_url(source, format).await?;
        debug!("[direct-stream] resolved stream for {}", source);

        let limit = Duration::from_secs(self.config.timeout_secs);
        let written = tokio::time::timeout(limit, self.copy_stream(&stream_url, destination))
            .await
            .map_err(|_| EngineError::Timeout(self.config.timeout_secs))??;

        info!(%source, %format, bytes = written, "direct stream copied");
        Ok(())
    }
}

/// First http(s) line of `yt-dlp -g` output
fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("http://") || l.starts_with("https://"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_url_skips_noise() {
        let stdout = "WARNING: something\nhttps://rr1.example/videoplayback?id=1\nhttps://rr1.example/audio\n";
        assert_eq!(
            first_url(stdout).as_deref(),
            Some("https://rr1.example/videoplayback?id=1")
        );
        assert_eq!(first_url("\n\n"), None);
    }

    #[test]
    fn test_stream_filter() {
        let backend = DirectStreamBackend::new(EngineConfig::default()).unwrap();
        assert_eq!(backend.stream_filter(MediaFormat::Webm), "bestaudio");
        let mp4 = backend.stream_filter(MediaFormat::Mp4);
        assert!(mp4.starts_with("best[height<=480]"));
        assert!(mp4.contains("acodec!=none"));
    }
}
