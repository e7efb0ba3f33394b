//! Supabase/PostgreSQL backend - remote relational database
//!
//! Column types follow the server dialect: `SERIAL` ids, `DOUBLE
//! PRECISION` coordinates, `TIMESTAMPTZ DEFAULT NOW()`. Inserts use
//! `RETURNING` to read the assigned id (and, for points, the timestamp)
//! in the same statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use super::{Storage, StorageError};
use crate::config::PostgresConfig;
use crate::models::{InsertedPoint, NewPoint, NewPost, Point, Post};

/// Pool size for the remote database.
const MAX_CONNECTIONS: u32 = 5;

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connect to the remote database over TLS.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(&config.connect_url())
            .await?;

        tracing::info!(
            host = %config.host,
            database = %config.database,
            "postgres connection established"
        );
        Ok(Self { pool })
    }
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: i64::from(row.try_get::<i32, _>("id")?),
        name: row.try_get("name")?,
        current_lat: row.try_get("current_lat")?,
        current_lng: row.try_get("current_lng")?,
        target_lat: row.try_get("target_lat")?,
        target_lng: row.try_get("target_lng")?,
        created_at: row.try_get("created_at")?,
    })
}

fn point_from_row(row: &PgRow) -> Result<Point, sqlx::Error> {
    Ok(Point {
        id: i64::from(row.try_get::<i32, _>("id")?),
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        category: row.try_get("category")?,
        creator_id: row.try_get("creator_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                current_lat DOUBLE PRECISION NOT NULL,
                current_lng DOUBLE PRECISION NOT NULL,
                target_lat DOUBLE PRECISION,
                target_lng DOUBLE PRECISION,
                created_at TIMESTAMPTZ DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS points (
                id SERIAL PRIMARY KEY,
                latitude DOUBLE PRECISION NOT NULL,
                longitude DOUBLE PRECISION NOT NULL,
                category VARCHAR(64) NOT NULL,
                creator_id VARCHAR(128) NOT NULL,
                created_at TIMESTAMPTZ DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<i64, StorageError> {
        let row = sqlx::query(
            r#"
            INSERT INTO posts (name, current_lat, current_lng, target_lat, target_lng)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&post.name)
        .bind(post.current_lat)
        .bind(post.current_lng)
        .bind(post.target_lat)
        .bind(post.target_lng)
        .fetch_one(&self.pool)
        .await?;

        Ok(i64::from(row.try_get::<i32, _>("id")?))
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
        let row = sqlx::query(
            r#"
            INSERT INTO points (latitude, longitude, category, creator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(&point.category)
        .bind(&point.creator_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(InsertedPoint {
            id: i64::from(row.try_get::<i32, _>("id")?),
            created_at: Some(row.try_get::<DateTime<Utc>, _>("created_at")?),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    // Live-database tests. Run against a scratch database with:
    //   USE_SUPABASE=1 SUPABASE_USER=... cargo test -p skytebane-server -- --ignored

    async fn open() -> PostgresStorage {
        let config = match StorageConfig::from_env().expect("config") {
            StorageConfig::Postgres(pg) => pg,
            other => panic!("set USE_SUPABASE=1 for live tests, got {other:?}"),
        };
        let storage = PostgresStorage::connect(&config).await.expect("connect");
        storage.init_schema().await.expect("init schema");
        storage
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn init_schema_is_idempotent() {
        let storage = open().await;
        storage.init_schema().await.expect("second init succeeds");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn point_insert_reports_timestamp() {
        let storage = open().await;
        let inserted = storage
            .insert_point(&NewPoint {
                latitude: 59.9,
                longitude: 10.7,
                category: "rail".to_string(),
                creator_id: "u1".to_string(),
            })
            .await
            .expect("insert point");

        assert!(inserted.id > 0);
        assert!(inserted.created_at.is_some());
    }
}
