use async_trait::async_trait;
use redis::AsyncCommands;
use skyfare_core::{OfferStore, StoreError};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }
}

fn backend(err: redis::RedisError) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl OfferStore for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(backend)?;
        // Redis expires keys itself; a nil reply is a miss.
        let value: Option<String> = conn.get(key).await.map_err(backend)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(backend)?;
        // EX takes whole seconds and rejects 0.
        let ttl_seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await.map_err(backend)?;
        debug!("Cached {} for {}s", key, ttl_seconds);
        Ok(())
    }
}
