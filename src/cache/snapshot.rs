use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::cache::error::CacheError;
use crate::cache::payload::FleetPayload;

/// The snapshot cache port: one well-known key, overwritten wholesale with
/// an expiry. Safe for concurrent use.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Replace the fleet snapshot atomically, expiring after `ttl`.
    async fn publish(&self, payload: &FleetPayload, ttl: Duration) -> Result<(), CacheError>;

    /// Raw JSON of the last published snapshot, if it has not expired.
    async fn fetch(&self) -> Result<Option<String>, CacheError>;

    /// Connectivity check; the worker refuses to start without it passing.
    async fn ping(&self) -> Result<(), CacheError>;
}

pub struct RedisSnapshotCache {
    client: redis::Client,
    key: String,
}

impl RedisSnapshotCache {
    pub fn open(url: &str, key: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(url)?,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    async fn publish(&self, payload: &FleetPayload, ttl: Duration) -> Result<(), CacheError> {
        let json = serde_json::to_string(payload)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&self.key, json, ttl.as_secs()).await?;
        Ok(())
    }

    async fn fetch(&self) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(&self.key).await?;
        Ok(value)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
