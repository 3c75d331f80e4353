use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
}
