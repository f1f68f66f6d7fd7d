// Form endpoints: GET / and POST /convert

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use tracing::error;

use super::view::{render_index, IndexView};
use crate::downloader::models::{ConversionRequest, ConversionResult, MediaFormat};
use crate::downloader::ErrorCategory;
use crate::AppState;

/// Fields posted by the index form
#[derive(Debug, Deserialize)]
pub struct ConvertForm {
    #[serde(rename = "videoID", default)]
    pub video_id: String,
    #[serde(default)]
    pub format: Option<String>,
}

/// GET /
pub async fn serve_index() -> Html<String> {
    Html(render_index(&IndexView::default()))
}

/// POST /convert
///
/// The conversion runs on its own task, so a client that disconnects
/// mid-download does not abort the write.
pub async fn convert(State(state): State<AppState>, Form(form): Form<ConvertForm>) -> Html<String> {
    let fallback_format = MediaFormat::normalize(form.format.as_deref());
    let request = ConversionRequest {
        locator: form.video_id,
        format_hint: form.format,
    };

    let orchestrator = state.orchestrator.clone();
    let result = match tokio::spawn(async move { orchestrator.convert(&request).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!("conversion task failed: {}", e);
            ConversionResult::failure(ErrorCategory::GenericDownloadError, fallback_format)
        }
    };

    Html(render_index(&IndexView::from(&result)))
}
