//! Post records - named positions with an optional target location

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Stored post row
#[derive(Debug, Clone)]
pub struct Post {
    pub id: i64,
    pub name: String,
    pub current_lat: f64,
    pub current_lng: f64,
    pub target_lat: Option<f64>,
    pub target_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Create payload. Target coordinates may be omitted and are stored NULL.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub name: String,
    pub current_lat: f64,
    pub current_lng: f64,
    #[serde(default)]
    pub target_lat: Option<f64>,
    #[serde(default)]
    pub target_lng: Option<f64>,
}
