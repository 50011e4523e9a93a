//! Sign-in: credentials in, session cookie out.
//!
//! Flow Overview:
//! 1) Validate the payload and verify credentials against the user store.
//! 2) Mint a signed token and a fresh session id.
//! 3) Write the session record, then the presence entry, both with the token lifetime.
//! 4) Set the `session_id` cookie and return the token details.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{
    credentials::{verify_credentials, CredentialError},
    error::AuthError,
    session::{session_cookie, SessionRecord},
    state::AuthState,
    types::{ErrorResponse, SignInRequest, SignInResponse},
    utils::{generate_session_id, normalize_email, validate_credentials},
};

/// A completed sign-in: the new session id and the response body.
pub(super) struct SignedIn {
    pub(super) session_id: String,
    pub(super) response: SignInResponse,
}

#[utoipa::path(
    post,
    path = "/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Session created; `session_id` cookie set", body = SignInResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Unknown user or wrong password", body = ErrorResponse),
        (status = 500, description = "Store or user store unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn sign_in(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request: SignInRequest = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected sign-in payload: {rejection}");
            return AuthError::Validation(rejection.body_text()).into_response();
        }
    };

    let signed_in = match create_session(&auth_state, request).await {
        Ok(signed_in) => signed_in,
        Err(err) => return err.into_response(),
    };

    let max_age = auth_state.config().session_ttl().as_secs();
    let cookie = match session_cookie(auth_state.config(), &signed_in.session_id, max_age) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return AuthError::Dependency("failed to create session").into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    (StatusCode::OK, headers, Json(signed_in.response)).into_response()
}

/// Run the sign-in flow up to, but not including, the cookie.
///
/// Nothing is written to the store unless the credentials check out. Once the
/// session record is stored, the only remaining write is presence, whose
/// failure is logged and ignored.
///
/// # Errors
/// [`AuthError::Validation`], [`AuthError::Authentication`] or
/// [`AuthError::Dependency`].
pub(super) async fn create_session(
    auth_state: &AuthState,
    request: SignInRequest,
) -> Result<SignedIn, AuthError> {
    let config = auth_state.config();
    let email = normalize_email(&request.email);

    let errors = validate_credentials(&email, &request.password, config.password_min_length());
    if !errors.is_empty() {
        return Err(AuthError::Validation(errors.join(", ")));
    }

    let user = verify_credentials(auth_state.users(), &email, &request.password)
        .await
        .map_err(|err| match err {
            CredentialError::NotFound => AuthError::Authentication("No user found"),
            CredentialError::InvalidCredential => AuthError::Authentication("password is invalid"),
            CredentialError::Unavailable(err) => {
                error!("Failed to look up user: {err}");
                AuthError::Dependency("failed to look up user")
            }
        })?;

    let ttl = config.session_ttl();
    let issued = auth_state
        .signer()
        .issue(user.id, &user.email, ttl)
        .map_err(|err| {
            error!("Failed to sign token: {err}");
            AuthError::Dependency("failed to create session")
        })?;

    let session_id = generate_session_id().map_err(|err| {
        error!("Failed to create session id: {err:#}");
        AuthError::Dependency("failed to create session")
    })?;
    let record = SessionRecord {
        token: issued.token.clone(),
        user_id: user.id,
    };
    auth_state
        .sessions()
        .put(&session_id, &record, ttl)
        .await
        .map_err(|err| {
            error!("Failed to store session: {err}");
            AuthError::Dependency("failed to save the session")
        })?;

    if let Err(err) = auth_state
        .presence()
        .mark_online(&session_id, user.id, &user.name, ttl)
        .await
    {
        warn!("Failed to mark user {} online: {err}", user.id);
    }

    info!("User {} signed in", user.id);

    Ok(SignedIn {
        session_id,
        response: SignInResponse {
            message: "Login successful".to_string(),
            expires: issued.expires_at,
            token: issued.token,
            user_id: user.id,
        },
    })
}
