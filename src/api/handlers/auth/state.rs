//! Auth state and configuration.

use std::{sync::Arc, time::Duration};

use super::{presence::PresenceRegistry, session::SessionStore, token::TokenSigner};
use crate::{store::KvStore, users::UserStore};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_PASSWORD_MIN_LENGTH: usize = 6;
pub(super) const PRESENCE_PREFIX: &str = "presence:";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: i64,
    cookie_secure: bool,
    cookie_domain: Option<String>,
    password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
            cookie_domain: None,
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn with_cookie_domain(mut self, domain: Option<String>) -> Self {
        self.cookie_domain = domain.filter(|domain| !domain.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_password_min_length(mut self, length: usize) -> Self {
        self.password_min_length = length;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Session lifetime shared by the token, the store TTL and the cookie max-age.
    /// Non-positive values are clamped to one second.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(u64::try_from(self.session_ttl_seconds.max(1)).unwrap_or(1))
    }

    pub(super) fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub(super) fn cookie_domain(&self) -> Option<&str> {
        self.cookie_domain.as_deref()
    }

    pub(super) fn password_min_length(&self) -> usize {
        self.password_min_length
    }
}

/// Everything a request needs, built once at startup and shared read-only.
pub struct AuthState {
    config: AuthConfig,
    signer: TokenSigner,
    sessions: SessionStore,
    presence: PresenceRegistry,
    users: Arc<dyn UserStore>,
    kv: Arc<dyn KvStore>,
}

impl AuthState {
    pub fn new(
        config: AuthConfig,
        signer: TokenSigner,
        kv: Arc<dyn KvStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            config,
            signer,
            sessions: SessionStore::new(kv.clone()),
            presence: PresenceRegistry::new(kv.clone(), PRESENCE_PREFIX),
            users,
            kv,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub(super) fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(super) fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub(crate) fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub(crate) fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }
}
