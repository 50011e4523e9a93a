//! "Who is online" registry.
//!
//! Each live session has a shadow entry `presence:<session id>` with the same
//! TTL. Listing is best-effort: entries that vanish or fail to decode between
//! the scan and the fetch are skipped.

use axum::{extract::Extension, response::IntoResponse, Json};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error};
use uuid::Uuid;

use super::{
    error::AuthError,
    gate::AuthenticatedUser,
    session::SessionError,
    state::AuthState,
    types::{ErrorResponse, OnlineUsersResponse, PresenceRecord},
};
use crate::store::KvStore;

#[derive(Clone)]
pub struct PresenceRegistry {
    kv: Arc<dyn KvStore>,
    prefix: String,
}

impl PresenceRegistry {
    pub fn new(kv: Arc<dyn KvStore>, prefix: &str) -> Self {
        Self {
            kv,
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{session_id}", self.prefix)
    }

    /// # Errors
    /// Returns an error if encoding or the store write fails.
    pub async fn mark_online(
        &self,
        session_id: &str,
        user_id: Uuid,
        username: &str,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        let record = PresenceRecord {
            username: username.to_string(),
            user_id,
        };
        let value = serde_json::to_string(&record).map_err(SessionError::Encode)?;
        self.kv.set(&self.key(session_id), value, ttl).await?;
        Ok(())
    }

    /// Idempotent.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn mark_offline(&self, session_id: &str) -> Result<(), SessionError> {
        self.kv.delete(&self.key(session_id)).await?;
        Ok(())
    }

    /// Every online entry, one per live session.
    ///
    /// Keys are enumerated first, then all values are fetched in a single
    /// pipelined round trip.
    ///
    /// # Errors
    /// Returns an error only if the store itself fails.
    pub async fn list_online(&self) -> Result<Vec<PresenceRecord>, SessionError> {
        let keys = self.kv.scan_prefix(&self.prefix).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values = self.kv.get_many(&keys).await?;
        let online = keys
            .iter()
            .zip(values)
            .filter_map(|(key, value)| {
                let Some(value) = value else {
                    debug!("presence key {key} expired before fetch");
                    return None;
                };
                match serde_json::from_str::<PresenceRecord>(&value) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        debug!("skipping undecodable presence key {key}: {err}");
                        None
                    }
                }
            })
            .collect();

        Ok(online)
    }
}

#[utoipa::path(
    get,
    path = "/fetch-online-users",
    responses(
        (status = 200, description = "Users with a live session", body = OnlineUsersResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    ),
    tag = "presence"
)]
pub async fn online_users(
    auth_state: Extension<Arc<AuthState>>,
    _user: Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    match auth_state.presence().list_online().await {
        Ok(online_users) => {
            let message = if online_users.is_empty() {
                "No online users found"
            } else {
                "OK"
            };
            Json(OnlineUsersResponse {
                message: message.to_string(),
                online_users,
            })
            .into_response()
        }
        Err(err) => {
            error!("Failed to list online users: {err}");
            AuthError::Dependency("failed to fetch online users").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const TTL: Duration = Duration::from_secs(60);

    fn registry() -> (Arc<MemoryStore>, PresenceRegistry) {
        let kv = Arc::new(MemoryStore::new());
        let registry = PresenceRegistry::new(kv.clone(), "presence:");
        (kv, registry)
    }

    #[tokio::test]
    async fn mark_online_then_offline() -> anyhow::Result<()> {
        let (kv, registry) = registry();
        let user_id = Uuid::new_v4();
        registry.mark_online("s1", user_id, "alice", TTL).await?;
        assert!(kv.get("presence:s1").await?.is_some());

        let online = registry.list_online().await?;
        assert_eq!(
            online,
            vec![PresenceRecord {
                username: "alice".to_string(),
                user_id,
            }]
        );

        registry.mark_offline("s1").await?;
        registry.mark_offline("s1").await?;
        assert!(registry.list_online().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn list_online_skips_undecodable_entries() -> anyhow::Result<()> {
        let (kv, registry) = registry();
        registry
            .mark_online("s1", Uuid::new_v4(), "alice", TTL)
            .await?;
        kv.set("presence:broken", "garbage".to_string(), TTL).await?;
        kv.set("unrelated", "{}".to_string(), TTL).await?;

        let online = registry.list_online().await?;
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].username, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn list_online_fetches_in_one_batch() -> anyhow::Result<()> {
        let (kv, registry) = registry();
        for index in 0..10 {
            registry
                .mark_online(&format!("s{index}"), Uuid::new_v4(), "user", TTL)
                .await?;
        }
        let before = kv.operations();
        let online = registry.list_online().await?;
        assert_eq!(online.len(), 10);
        // one scan + one batched fetch, independent of the number of entries
        assert_eq!(kv.operations() - before, 2);
        Ok(())
    }

    #[tokio::test]
    async fn empty_registry_skips_fetch() -> anyhow::Result<()> {
        let (kv, registry) = registry();
        assert!(registry.list_online().await?.is_empty());
        assert_eq!(kv.operations(), 1);
        Ok(())
    }
}
