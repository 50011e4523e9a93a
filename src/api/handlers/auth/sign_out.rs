//! Sign-out: revoke the current session and clear the cookie.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    error::AuthError,
    gate::AuthenticatedUser,
    session::clear_session_cookie,
    state::AuthState,
    types::{ErrorResponse, MessageResponse},
};

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session revoked; cookie cleared", body = MessageResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    auth_state: Extension<Arc<AuthState>>,
    user: Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    if let Err(err) = end_session(&auth_state, &user.session_id).await {
        return err.into_response();
    }

    info!("User {} signed out", user.user_id);

    let mut headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }

    let body = MessageResponse {
        message: "Logged out successfully".to_string(),
    };
    (StatusCode::OK, headers, Json(body)).into_response()
}

/// Delete the session record, then its presence entry.
///
/// # Errors
/// [`AuthError::Dependency`] if the session record cannot be deleted. A failed
/// presence delete is only logged; the entry expires with the session TTL.
pub(super) async fn end_session(auth_state: &AuthState, session_id: &str) -> Result<(), AuthError> {
    auth_state.sessions().delete(session_id).await.map_err(|err| {
        error!("Failed to delete session: {err}");
        AuthError::Dependency("failed to end session")
    })?;

    if let Err(err) = auth_state.presence().mark_offline(session_id).await {
        warn!("Failed to remove presence entry: {err}");
    }

    Ok(())
}
