//! Password hashing and credential checks.
//!
//! Stored passwords are Argon2 PHC strings; verification goes through
//! `PasswordVerifier`, which compares digests in constant time.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::users::{User, UserStore, UserStoreError};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no user found")]
    NotFound,
    #[error("invalid credential")]
    InvalidCredential,
    #[error(transparent)]
    Unavailable(#[from] UserStoreError),
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("failed to generate salt: {0}")]
    Entropy(#[from] rand::Error),
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hash a password into an Argon2id PHC string with a random salt.
///
/// # Errors
/// Returns an error if the OS RNG fails or Argon2 rejects the input.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    hash_password_with(password, &mut OsRng)
}

fn hash_password_with<R: RngCore>(
    password: &str,
    rng: &mut R,
) -> Result<String, PasswordHashError> {
    let mut bytes = [0u8; 16];
    rng.try_fill_bytes(&mut bytes)?;
    let salt = SaltString::encode_b64(&bytes).map_err(PasswordHashError::Hash)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordHashError::Hash)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Unparsable hashes never match.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}

/// Look up the user by email and check the password.
///
/// # Errors
/// [`CredentialError::NotFound`], [`CredentialError::InvalidCredential`], or
/// [`CredentialError::Unavailable`] when the user store fails.
#[instrument(skip(users, password))]
pub async fn verify_credentials(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let Some(user) = users.find_user_by_email(email).await? else {
        debug!("no user for email");
        return Err(CredentialError::NotFound);
    };

    if !verify_password(password, &user.password_hash) {
        debug!("password mismatch for user {}", user.id);
        return Err(CredentialError::InvalidCredential);
    }

    Ok(user)
}
