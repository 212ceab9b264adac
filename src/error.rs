//! Error types for the todo API.
//!
//! # Design
//! Every failure a request can hit maps to one [`ApiError`] variant, and
//! every variant renders as the same JSON body:
//! `{"error": true, "message": "..."}`. `UserNotFound` gets a dedicated
//! variant because identity resolution fails with it before any todo
//! operation runs; `UsernameTaken` and `TodoNotFound` are the two ways an
//! operation itself can fail. The rejection variants fold axum's extractor
//! failures into the same body shape so no 4xx leaves the API as plain
//! text. The message strings of the service variants are part of the HTTP
//! contract.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No registered user matches the `username` request header.
    #[error("No user registered with the provided username")]
    UserNotFound,

    /// Registration was attempted with a username that already exists.
    #[error("Username already taken")]
    UsernameTaken,

    /// The todo id does not exist among the resolved user's todos.
    #[error("No todo found with the given id")]
    TodoNotFound,

    /// The supplied deadline did not parse as any accepted form.
    #[error("Deadline is not a valid ISO-8601 timestamp or date")]
    InvalidDeadline,

    /// The request body was rejected before reaching a handler.
    #[error(transparent)]
    BodyRejection(#[from] JsonRejection),

    /// The todo id path segment was rejected before reaching a handler.
    #[error(transparent)]
    PathRejection(#[from] PathRejection),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound | ApiError::TodoNotFound => StatusCode::NOT_FOUND,
            ApiError::UsernameTaken | ApiError::InvalidDeadline => StatusCode::BAD_REQUEST,
            ApiError::BodyRejection(rejection) => rejection.status(),
            ApiError::PathRejection(rejection) => rejection.status(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BodyRejection(rejection) => rejection.body_text(),
            ApiError::PathRejection(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: true,
            message: self.message(),
        };
        (self.status(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn rendered(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn user_not_found_renders_404_with_contract_message() {
        let (status, body) = rendered(ApiError::UserNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], true);
        assert_eq!(
            body["message"],
            "No user registered with the provided username"
        );
    }

    #[tokio::test]
    async fn username_taken_renders_400() {
        let (status, body) = rendered(ApiError::UsernameTaken).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Username already taken");
    }

    #[tokio::test]
    async fn todo_not_found_renders_404() {
        let (status, body) = rendered(ApiError::TodoNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No todo found with the given id");
    }

    #[tokio::test]
    async fn invalid_deadline_renders_400() {
        let (status, body) = rendered(ApiError::InvalidDeadline).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }
}
