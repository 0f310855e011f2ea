use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};
use validator::Validate;

use crate::models::AppState;
use crate::types::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// Job ids may arrive as JSON strings or numbers
    #[serde(default, deserialize_with = "crate::queue::jobs::opaque_id")]
    #[validate(length(min = 1))]
    pub document_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/translate", post(translate))
        .with_state(state)
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let document_id = match payload {
        Ok(Json(request)) if request.validate().is_ok() => request.document_id,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Document ID is required" })),
            )
        }
    };

    info!(document_id = %document_id, "Translation request received");

    match state.worker.process_job(&document_id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "translationId": outcome.document_id,
                "translatedFilePath": outcome.translated_file_path,
            })),
        ),
        Err(e) => {
            error!(document_id = %document_id, error = %e, "Translation request failed");
            error_response(&e)
        }
    }
}

fn error_response(err: &AppError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        AppError::NotFound(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch translation job".to_string(),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to process translation: {}", other),
        ),
    };
    (status, Json(json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_mapping() {
        let (status, Json(body)) = error_response(&AppError::NotFound("no rows".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch translation job" }));

        let (status, Json(body)) = error_response(&AppError::Upload("HTTP 403".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to process translation: Failed to upload translated file: HTTP 403" })
        );

        let (status, _) = error_response(&AppError::InvalidRequest("bad".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
