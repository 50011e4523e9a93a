//! Authenticated self-service endpoints.
//!
//! The gate has already resolved the session; these handlers only read the
//! [`AuthenticatedUser`] it left in the request extensions.

use axum::{extract::Extension, Json};

use super::auth::{
    types::{ErrorResponse, MessageResponse, SessionResponse},
    AuthenticatedUser,
};

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Return the authenticated session context.", body = SessionResponse),
        (status = 401, description = "Missing or invalid session cookie.", body = ErrorResponse),
    ),
    tag = "me"
)]
pub async fn me(user: Extension<AuthenticatedUser>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: user.user_id,
        email: user.email.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/auth-route",
    responses(
        (status = 200, description = "Authenticated routes are reachable.", body = MessageResponse),
        (status = 401, description = "Missing or invalid session cookie.", body = ErrorResponse),
    ),
    tag = "me"
)]
pub async fn auth_route(_user: Extension<AuthenticatedUser>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Authenticated routes are working".to_string(),
    })
}
