//! Session records and the `session_id` cookie.
//!
//! The cookie only carries the session id. Everything else (user id, signed
//! token) lives in the store under that id and expires with it.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use uuid::Uuid;

use super::state::AuthConfig;
use crate::store::{KvStore, StoreError};

pub(crate) const SESSION_COOKIE_NAME: &str = "session_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode session record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode session record: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Session id -> [`SessionRecord`], one key per session.
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KvStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// # Errors
    /// Returns an error if encoding or the store write fails.
    pub async fn put(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        let value = serde_json::to_string(record).map_err(SessionError::Encode)?;
        self.kv.set(session_id, value, ttl).await?;
        Ok(())
    }

    /// `Ok(None)` for unknown or expired sessions.
    ///
    /// # Errors
    /// Returns an error if the store fails or the stored value does not decode.
    pub async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let Some(value) = self.kv.get(session_id).await? else {
            return Ok(None);
        };
        serde_json::from_str(&value)
            .map(Some)
            .map_err(SessionError::Decode)
    }

    /// Idempotent: deleting an unknown session succeeds.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        self.kv.delete(session_id).await?;
        Ok(())
    }
}

/// Build the `Set-Cookie` value carrying a new session id.
pub(super) fn session_cookie(
    config: &AuthConfig,
    session_id: &str,
    max_age_seconds: u64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    push_cookie_attributes(config, &mut cookie);
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value that makes the browser drop the session cookie now.
pub(super) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    push_cookie_attributes(config, &mut cookie);
    HeaderValue::from_str(&cookie)
}

fn push_cookie_attributes(config: &AuthConfig, cookie: &mut String) {
    if let Some(domain) = config.cookie_domain() {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
}

/// Read the session id from the `Cookie` header(s). Empty values count as missing.
pub(crate) fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let key = parts.next()?.trim();
            let val = parts.next()?.trim();
            (key == SESSION_COOKIE_NAME && !val.is_empty()).then(|| val.to_string())
        })
        .next()
}
