//! Authorization gate for protected routes.
//!
//! Flow: read the `session_id` cookie, load the session record, re-verify the
//! embedded token, then hand an [`AuthenticatedUser`] to the wrapped handler via
//! request extensions. Every failure ends the request; nothing is retried.
//! Expiry is observed as a store miss because the record TTL equals the token
//! lifetime; the token check covers clock skew and tampered records.

use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, Span};
use uuid::Uuid;

use super::{
    error::AuthError,
    session::{extract_session_id, SessionError},
    state::AuthState,
};

/// Identity of the caller, available to handlers behind the gate.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub session_id: String,
}

/// Resolve the request's session cookie into an [`AuthenticatedUser`].
///
/// # Errors
/// [`AuthError::Authentication`] for a missing cookie, unknown session or bad
/// token; [`AuthError::Dependency`] when the store is unavailable.
pub async fn authorize(
    auth_state: &AuthState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    // No cookie, no store round trip.
    let Some(session_id) = extract_session_id(headers) else {
        return Err(AuthError::Authentication("Unauthorized - no session"));
    };

    let record = match auth_state.sessions().get(&session_id).await {
        Ok(Some(record)) => record,
        Ok(None) => return Err(AuthError::Authentication("Invalid or expired session")),
        Err(SessionError::Decode(err)) => {
            debug!("Session record failed to decode: {err}");
            return Err(AuthError::Authentication("Invalid or expired session"));
        }
        Err(err) => {
            error!("Failed to load session: {err}");
            return Err(AuthError::Dependency("failed to load session"));
        }
    };

    let claims = auth_state.signer().verify(&record.token).map_err(|err| {
        debug!("Session token rejected: {err}");
        AuthError::Authentication("Invalid token")
    })?;

    // The record and the token it wraps must agree on who this is.
    if claims.user_id != record.user_id {
        debug!("Session record user does not match token subject");
        return Err(AuthError::Authentication("Invalid token"));
    }

    Ok(AuthenticatedUser {
        user_id: record.user_id,
        email: claims.email,
        session_id,
    })
}

/// Middleware wrapping every protected route.
///
/// Reads [`AuthState`] from the request extensions, so the `Extension` layer
/// must sit outside the route layer.
pub async fn require_session(
    Extension(auth_state): Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(&auth_state, request.headers()).await {
        Ok(user) => {
            Span::current().record("user_id", tracing::field::display(user.user_id));
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
