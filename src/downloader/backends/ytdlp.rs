// Primary strategy: yt-dlp writes the selected format straight to the destination

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::downloader::errors::EngineError;
use crate::downloader::models::{CanonicalSource, EngineConfig, MediaFormat};
use crate::downloader::traits::AcquisitionStrategy;
use crate::downloader::utils::{network_args, output_error, run_output_with_timeout};

pub struct YtDlpBackend {
    config: EngineConfig,
}

impl YtDlpBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// yt-dlp format selector for the requested container
    fn format_arg(&self, format: MediaFormat) -> String {
        match format {
            MediaFormat::Webm => "bestaudio[ext=webm]/bestaudio/best".to_string(),
            MediaFormat::Mp4 => {
                let h = self.config.max_video_height;
                format!(
                    "bv*[height<={h}][ext=mp4]+ba[ext=m4a]/bv*[height<={h}]+ba/b[height<={h}]/b"
                )
            }
        }
    }

    fn build_args(&self, source: &CanonicalSource, format: MediaFormat, destination: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format_arg(format),
            "--no-playlist".to_string(),
            "--no-update".to_string(),
            "--no-part".to_string(),
            "--force-overwrites".to_string(),
            "--no-check-certificates".to_string(),
            "--prefer-free-formats".to_string(),
            "--add-header".to_string(),
            "Referer:https://www.youtube.com/".to_string(),
            "-o".to_string(),
            destination.to_string_lossy().to_string(),
        ];

        if format == MediaFormat::Mp4 {
            args.push("--merge-output-format".to_string());
            args.push("mp4".to_string());
        }

        args.extend(network_args(&self.config));
        args.push(source.to_string());
        args
    }
}

#[async_trait]
impl AcquisitionStrategy for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn attempt(
        &self,
        source: &CanonicalSource,
        format: MediaFormat,
        destination: &Path,
    ) -> Result<(), EngineError> {
        let args = self.build_args(source, format, destination);
        debug!("[yt-dlp] {} {}", self.config.ytdlp_path, args.join(" "));

        let output =
            run_output_with_timeout(&self.config.ytdlp_path, &args, self.config.timeout_secs).await?;

        if output.status.success() {
            info!(%source, %format, "yt-dlp finished");
            Ok(())
        } else {
            Err(output_error(&output))
        }
    }
}
