use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::errors::Result;

/// Key/value cache holding the published live snapshots.
#[async_trait]
pub trait LiveCache: Send + Sync {
    async fn set_with_ttl(&self, key: &str, value: &str, seconds: u64) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;
}

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis");
        Ok(RedisCache { conn })
    }
}

#[async_trait]
impl LiveCache for RedisCache {
    async fn set_with_ttl(&self, key: &str, value: &str, seconds: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }
}
