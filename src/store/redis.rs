use super::{ttl_millis, KvStore, StoreError};
use async_trait::async_trait;
use redis::{
    aio::{ConnectionLike, ConnectionManager},
    AsyncCommands,
};
use std::time::Duration;
use tracing::{debug, info_span, Instrument};

const SCAN_BATCH: usize = 200;

/// Redis-backed store sharing one multiplexed connection across requests.
#[derive(Clone)]
pub struct RedisStore<C = ConnectionManager> {
    conn: C,
}

impl RedisStore {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379/0`).
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self::with_connection(manager))
    }
}

impl<C> RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    /// Wrap an already established connection.
    pub fn with_connection(conn: C) -> Self {
        Self { conn }
    }

    fn connection(&self) -> C {
        self.conn.clone()
    }
}

#[async_trait]
impl<C> KvStore for RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let millis = ttl_millis(ttl)?;
        let mut conn = self.connection();
        let span = info_span!("kv.command", db.system = "redis", db.operation = "SET");
        let (): () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(millis)
            .query_async(&mut conn)
            .instrument(span)
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection();
        let span = info_span!("kv.command", db.system = "redis", db.operation = "GET");
        let value: Option<String> = conn.get(key).instrument(span).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection();
        let span = info_span!("kv.command", db.system = "redis", db.operation = "DEL");
        let removed: i64 = conn.del(key).instrument(span).await?;
        debug!("DEL removed {} key(s)", removed);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection();
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        // SCAN instead of KEYS so a large keyspace never blocks the server.
        loop {
            let span = info_span!("kv.command", db.system = "redis", db.operation = "SCAN");
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .instrument(span)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once across iterations.
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.connection();
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.get(key);
        }
        let span = info_span!(
            "kv.pipeline",
            db.system = "redis",
            db.operation = "GET",
            batch.size = keys.len()
        );
        let values: Vec<Option<String>> = pipe.query_async(&mut conn).instrument(span).await?;
        Ok(values)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
