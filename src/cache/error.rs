use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(#[from] redis::RedisError),
    #[error("payload encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
