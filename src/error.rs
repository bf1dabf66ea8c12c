/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - credential / repo / validation error を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::CredentialError;

/// `{"message": "...", "error": "..."}`; `error` only when there is a detail worth showing.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Token is missing")]
    MissingCredential,
    #[error("Token is invalid")]
    InvalidCredential(String),
    #[error("{message}")]
    BadRequest {
        message: &'static str,
        detail: Option<String>,
    },
    #[error("Note not found")]
    NotFound,
    #[error("Request timed out")]
    Timeout,
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: &'static str, detail: Option<String>) -> Self {
        Self::BadRequest { message, detail }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error) = match self {
            AppError::MissingCredential => (StatusCode::UNAUTHORIZED, None),
            AppError::InvalidCredential(detail) => (StatusCode::UNAUTHORIZED, Some(detail)),
            AppError::BadRequest { detail, .. } => (StatusCode::BAD_REQUEST, detail),
            AppError::NotFound => (StatusCode::NOT_FOUND, None),
            AppError::Timeout => (StatusCode::REQUEST_TIMEOUT, None),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        (status, Json(ErrorResponse { message, error })).into_response()
    }
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Missing => AppError::MissingCredential,
            CredentialError::Invalid(detail) => AppError::InvalidCredential(detail),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Validation(message) => AppError::bad_request(message, None),
            RepoError::NotFound => AppError::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn credential_errors_are_401_with_detail() {
        let (status, body) = render(CredentialError::Missing.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"message": "Token is missing"}));

        let (status, body) =
            render(CredentialError::Invalid("wrong number of segments".into()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            serde_json::json!({"message": "Token is invalid", "error": "wrong number of segments"})
        );
    }

    #[tokio::test]
    async fn repo_errors_map_to_400_and_404() {
        let err = RepoError::Validation("Title and content are required");
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"message": "Title and content are required"}));

        let (status, body) = render(RepoError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"message": "Note not found"}));
    }
}
