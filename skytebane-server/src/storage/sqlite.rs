//! SQLite backend - embedded file database
//!
//! Column types follow the embedded dialect: `INTEGER PRIMARY KEY
//! AUTOINCREMENT` ids (never reused), `REAL` coordinates, `TIMESTAMP
//! DEFAULT CURRENT_TIMESTAMP`. Timestamps are stored as UTC wall-clock
//! text, so rows are read back as `NaiveDateTime` and tagged UTC.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::{Storage, StorageError};
use crate::models::{InsertedPoint, NewPoint, NewPost, Point, Post};

/// Pool size for the embedded database.
const MAX_CONNECTIONS: u32 = 5;

pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open the database file, creating it if missing.
    pub async fn connect(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        tracing::info!(path = %path.display(), "sqlite database opened");
        Ok(Self { pool })
    }
}

fn post_from_row(row: &SqliteRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        current_lat: row.try_get("current_lat")?,
        current_lng: row.try_get("current_lng")?,
        target_lat: row.try_get("target_lat")?,
        target_lng: row.try_get("target_lng")?,
        created_at: row.try_get::<NaiveDateTime, _>("created_at")?.and_utc(),
    })
}

fn point_from_row(row: &SqliteRow) -> Result<Point, sqlx::Error> {
    Ok(Point {
        id: row.try_get("id")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        category: row.try_get("category")?,
        creator_id: row.try_get("creator_id")?,
        created_at: row.try_get::<NaiveDateTime, _>("created_at")?.and_utc(),
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                current_lat REAL NOT NULL,
                current_lng REAL NOT NULL,
                target_lat REAL,
                target_lng REAL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS points (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                category TEXT NOT NULL,
                creator_id TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<i64, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO posts (name, current_lat, current_lng, target_lat, target_lng)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.name)
        .bind(post.current_lat)
        .bind(post.current_lng)
        .bind(post.target_lat)
        .bind(post.target_lng)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StorageError> {
        let rows = sqlx::query("SELECT * FROM posts")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| post_from_row(row).map_err(StorageError::from))
            .collect()
    }

    async fn insert_point(&self, point: &NewPoint) -> Result<InsertedPoint, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO points (latitude, longitude, category, creator_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(&point.category)
        .bind(&point.creator_id)
        .execute(&self.pool)
        .await?;

        // The embedded backend does not report the stored timestamp back.
        Ok(InsertedPoint {
            id: result.last_insert_rowid(),
            created_at: None,
        })
    }

    async fn list_points(&self) -> Result<Vec<Point>, StorageError> {
        let rows = sqlx::query("SELECT * FROM points")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| point_from_row(row).map_err(StorageError::from))
            .collect()
    }
}
