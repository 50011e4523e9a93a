//! Boundary error taxonomy for auth endpoints.
//!
//! Components return their own typed errors; handlers convert them here and
//! log whatever internal detail they have before doing so. The client only ever
//! sees `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::types::ErrorResponse;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed or invalid input.
    #[error("{0}")]
    Validation(String),
    /// Bad credentials, missing cookie, unknown session or bad token.
    #[error("{0}")]
    Authentication(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// Store or user store unreachable, serialization failure.
    #[error("{0}")]
    Dependency(&'static str),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AuthError::Validation("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Authentication("nope").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Conflict("dup").status(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Dependency("down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn renders_error_body() -> anyhow::Result<()> {
        let response = AuthError::Authentication("Invalid token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(value, serde_json::json!({ "error": "Invalid token" }));
        Ok(())
    }
}
