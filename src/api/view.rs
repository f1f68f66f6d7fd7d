// Form view rendering for GET / and POST /convert

use askama::Template;
use tracing::warn;

use crate::downloader::models::ConversionResult;

/// Values the index page is rendered with
#[derive(Debug, Clone, Default, PartialEq, Eq, Template)]
#[template(path = "index.html", escape = "html")]
pub struct IndexView {
    /// `None` before any conversion was attempted
    pub success: Option<bool>,
    pub message: String,
    pub song_title: String,
    pub song_link: String,
    pub format: String,
}

impl IndexView {
    fn succeeded(&self) -> bool {
        self.success == Some(true)
    }

    fn failed(&self) -> bool {
        self.success == Some(false)
    }

    fn is_selected(&self, value: &str) -> bool {
        self.format == value
    }
}

impl From<&ConversionResult> for IndexView {
    fn from(result: &ConversionResult) -> Self {
        Self {
            success: Some(result.ok),
            message: result.message().to_string(),
            song_title: result.display_title.clone().unwrap_or_default(),
            song_link: result.artifact_link.clone().unwrap_or_default(),
            format: result.format.to_string(),
        }
    }
}

pub fn render_index(view: &IndexView) -> String {
    match view.render() {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "failed to render index template");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::errors::ErrorCategory;
    use crate::downloader::models::MediaFormat;

    #[test]
    fn test_initial_view_has_no_result() {
        let html = render_index(&IndexView::default());
        assert!(html.contains(r#"name="videoID""#));
        assert!(!html.contains("class=\"result"));
        assert!(!html.contains(" selected"));
    }

    #[test]
    fn test_failure_view_shows_category_message() {
        let result = ConversionResult::failure(ErrorCategory::NotFound, MediaFormat::Mp4);
        let html = render_index(&IndexView::from(&result));
        assert!(html.contains("result error"));
        assert!(html.contains(ErrorCategory::NotFound.message()));
        assert!(html.contains(r#"<option value="mp4" selected>"#));
        assert!(!html.contains("result success"));
    }

    #[test]
    fn test_success_view_links_artifact() {
        let view = IndexView {
            success: Some(true),
            message: String::new(),
            song_title: "dQw4w9WgXcQ".to_string(),
            song_link: "/dQw4w9WgXcQ.webm".to_string(),
            format: "webm".to_string(),
        };
        let html = render_index(&view);
        assert!(html.contains("result success"));
        assert!(html.contains(r#"href="/dQw4w9WgXcQ.webm""#));
        assert!(html.contains(r#"<option value="webm" selected>"#));
    }

    #[test]
    fn test_values_are_escaped() {
        let view = IndexView {
            success: Some(false),
            message: r#"<script>alert("x")</script> & more"#.to_string(),
            ..IndexView::default()
        };
        let html = render_index(&view);
        assert!(!html.contains("<script>"));
        assert!(!html.contains(r#"("x")"#));
        assert!(!html.contains("& more"));
        assert!(html.contains("alert"));
    }
}
