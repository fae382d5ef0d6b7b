use redis::{aio::MultiplexedConnection, Client};

use crate::config::RedisConfig;

#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    pub async fn connect(config: &RedisConfig) -> redis::RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(RedisClient { conn })
    }

    pub async fn ping(&self) -> redis::RedisResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}
