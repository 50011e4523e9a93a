//! Small helpers for input validation and session identifiers.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;

const SESSION_ID_BYTES: usize = 32;

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(super) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .is_ok_and(|regex| regex.is_match(email))
}

/// Collect every problem with an email/password pair, in field order.
pub(super) fn validate_credentials(email: &str, password: &str, min_length: usize) -> Vec<String> {
    let mut errors = Vec::new();

    if email.trim().is_empty() {
        errors.push("empty email is not allowed".to_string());
    } else if !valid_email(email.trim()) {
        errors.push("email is not valid".to_string());
    }

    if password.chars().count() < min_length {
        errors.push(format!(
            "min length of password must be at least {min_length} chars"
        ));
    }

    errors
}

/// Create a new session identifier for the cookie and store key.
///
/// 32 bytes from the OS CSPRNG; the value carries no meaning of its own.
pub(super) fn generate_session_id() -> Result<String> {
    session_id_from(&mut OsRng)
}

fn session_id_from<R: RngCore>(rng: &mut R) -> Result<String> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .context("failed to generate session id")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Entropy source that always fails.
#[cfg(test)]
pub(super) struct FailingRng;

#[cfg(test)]
impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new("entropy source unavailable"))
    }
}
