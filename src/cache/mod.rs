use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, warn};

use crate::redis_client::RedisClient;

pub mod movies;
pub mod users;

/// Read-through JSON cache on top of Redis.
///
/// Every entry expires after `ttl_seconds`. Redis trouble never fails a
/// request: a broken read counts as a miss and a broken write is logged.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    ttl_seconds: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    /// Returns the cached value for `key`, or runs `load` and caches its result.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key, "cache hit");
                return Ok(value);
            }
            Ok(None) => debug!(key, "cache miss"),
            Err(e) => warn!(key, error = %e, "cache read failed, falling back to database"),
        }

        let value = load().await?;
        if let Err(e) = self.put_json(key, &value).await {
            warn!(key, error = %e, "failed to populate cache");
        }
        Ok(value)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(key).await?;
        data.map(|data| {
            serde_json::from_str(&data).map_err(|_| {
                redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error"))
            })
        })
        .transpose()
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> redis::RedisResult<()> {
        let data = serde_json::to_string(value).map_err(|_| {
            redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error"))
        })?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(key, data, self.ttl_seconds).await
    }

    /// Drops the given keys. Failures are logged and otherwise ignored.
    pub async fn invalidate(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        let mut conn = self.redis.conn.clone();
        let result: redis::RedisResult<()> = conn.del(keys).await;
        if let Err(e) = result {
            warn!(?keys, error = %e, "failed to invalidate cache keys");
        }
    }

    /// Drops every key starting with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let pattern = format!("{}*", prefix);
        let mut conn = self.redis.conn.clone();
        let keys: redis::RedisResult<Vec<String>> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await;
        match keys {
            Ok(keys) => self.invalidate(&keys).await,
            Err(e) => warn!(pattern = %pattern, error = %e, "failed to list cache keys"),
        }
    }
}
