use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the whole request surface. Every handler translates
/// failures into exactly one of these; nothing is re-thrown past a handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Collected request-shape validation failures, returned together.
    #[error("validation failed")]
    Validation(Vec<String>),

    /// Duplicate email on registration. The public contract surfaces this
    /// as 400, not 409.
    #[error("User already exists with this email")]
    DuplicateEmail,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": errors.join("; ") })),
            )
                .into_response(),
            ApiError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "User already exists with this email" })),
            )
                .into_response(),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(e) => {
                // Cause is logged, never returned to the client.
                error!(error = %e, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_renders_error_json() {
        let resp = ApiError::NotFound("Item not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body, json!({ "error": "Item not found" }));
    }

    #[tokio::test]
    async fn duplicate_email_is_bad_request() {
        let resp = ApiError::DuplicateEmail.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(
            body,
            json!({ "error": "User already exists with this email" })
        );
    }

    #[tokio::test]
    async fn validation_errors_are_returned_together() {
        let resp = ApiError::Validation(vec![
            "Invalid email".into(),
            "Password too short".into(),
        ])
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Invalid email; Password too short");
    }

    #[tokio::test]
    async fn internal_is_opaque() {
        let resp = ApiError::Internal(anyhow::anyhow!("db exploded")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(text, "Internal server error");
        assert!(!text.contains("db exploded"));
    }
}
