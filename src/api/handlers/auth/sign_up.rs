//! Account creation.
//!
//! Passwords are hashed with Argon2 before they reach the user store; the
//! plaintext never leaves this handler.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::{
    credentials::hash_password,
    error::AuthError,
    state::AuthState,
    types::{ErrorResponse, SignUpRequest, SignUpResponse},
    utils::{normalize_email, validate_credentials},
};
use crate::users::{CreateOutcome, NewUser};

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created", body = SignUpResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "User store unavailable", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request: SignUpRequest = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected sign-up payload: {rejection}");
            return AuthError::Validation(rejection.body_text()).into_response();
        }
    };

    match create_user(&auth_state, request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_user(
    auth_state: &AuthState,
    request: SignUpRequest,
) -> Result<SignUpResponse, AuthError> {
    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);

    let mut errors = Vec::new();
    if name.is_empty() {
        errors.push("name is required".to_string());
    }
    errors.extend(validate_credentials(
        &email,
        &request.password,
        auth_state.config().password_min_length(),
    ));
    if !errors.is_empty() {
        return Err(AuthError::Validation(errors.join(", ")));
    }

    let password_hash = hash_password(&request.password).map_err(|err| {
        error!("Failed to hash password: {err}");
        AuthError::Dependency("failed to create user")
    })?;

    let outcome = auth_state
        .users()
        .create_user(NewUser {
            email,
            password_hash,
            name,
        })
        .await
        .map_err(|err| {
            error!("Failed to create user: {err}");
            AuthError::Dependency("failed to create user")
        })?;

    match outcome {
        CreateOutcome::Created(user) => {
            info!("Created user {}", user.id);
            Ok(SignUpResponse {
                id: user.id,
                name: user.name,
                email: user.email,
            })
        }
        CreateOutcome::Conflict => Err(AuthError::Conflict("email already registered")),
    }
}
