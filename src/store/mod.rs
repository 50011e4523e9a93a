//! Key-value backend used for session and presence records.
//!
//! Every operation is a single-key command (or a pipeline of them); nothing here
//! needs a multi-key transaction. Values are opaque strings, callers own the
//! encoding.

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key-value backend error: {0}")]
    Backend(#[from] ::redis::RedisError),
    #[error("invalid ttl: {0:?}")]
    InvalidTtl(Duration),
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// List every live key starting with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Fetch many keys in one round trip; the result is index-aligned with `keys`.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// TTLs are sent to the backend in milliseconds and must be non-zero.
pub(crate) fn ttl_millis(ttl: Duration) -> Result<u64, StoreError> {
    let millis = u64::try_from(ttl.as_millis()).map_err(|_| StoreError::InvalidTtl(ttl))?;
    if millis == 0 {
        return Err(StoreError::InvalidTtl(ttl));
    }
    Ok(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_millis_rejects_zero() {
        assert!(matches!(
            ttl_millis(Duration::ZERO),
            Err(StoreError::InvalidTtl(_))
        ));
        assert!(ttl_millis(Duration::from_micros(10)).is_err());
    }

    #[test]
    fn ttl_millis_converts_seconds() {
        assert_eq!(ttl_millis(Duration::from_secs(3600)).ok(), Some(3_600_000));
    }
}
