//! Storage layer - backend trait and the SQLite/PostgreSQL implementations
//!
//! The backend is chosen once at startup and injected into the HTTP state
//! behind `Arc<dyn Storage>`; request handlers never branch on the backend.
//! Every operation executes exactly one statement against the backend's
//! connection pool.

pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageConfig;
use crate::models::{InsertedPoint, NewPoint, NewPost, Point, Post};

pub use postgres::PostgresStorage;
pub use sqlite::SqliteStorage;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Backend-agnostic persistence interface shared by both services.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Ensure the `posts` and `points` tables exist. Safe to call on every
    /// startup regardless of whether they already do.
    async fn init_schema(&self) -> Result<(), StorageError>;

    /// Insert one post, returning the backend-assigned id.
    async fn insert_post(&self, post: &NewPost) -> Result<i64, StorageError>;

    /// Fetch every post row. No pagination, no ordering guarantee.
    async fn list_posts(&self) -> Result<Vec<Post>, StorageError>;

    /// Insert one point, returning the backend-assigned id and, where the
    /// backend reports it, the server-assigned creation timestamp.
    async fn insert_point(&self, point: &NewPoint) -> Result<InsertedPoint, StorageError>;

    /// Fetch every point row.
    async fn list_points(&self) -> Result<Vec<Point>, StorageError>;
}

/// Connect the backend selected by configuration.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn Storage>, StorageError> {
    match config {
        StorageConfig::Sqlite { path } => Ok(Arc::new(SqliteStorage::connect(path).await?)),
        StorageConfig::Postgres(pg) => Ok(Arc::new(PostgresStorage::connect(pg).await?)),
    }
}
