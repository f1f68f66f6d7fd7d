// On-demand cleanup of stale artifacts

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::AppState;

/// POST /cleanup
///
/// Per-file failures are reported in `errors` but still count as success;
/// only an unreadable store fails the request.
pub async fn cleanup(State(state): State<AppState>) -> Response {
    match state.sweeper.sweep(state.retention).await {
        Ok(report) => Json(json!({
            "success": true,
            "message": format!("Deleted {} old file(s)", report.deleted_count),
            "deleted": report.deleted_count,
            "errors": report.errors,
        }))
        .into_response(),
        Err(e) => {
            error!("cleanup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Cleanup failed",
                })),
            )
                .into_response()
        }
    }
}
