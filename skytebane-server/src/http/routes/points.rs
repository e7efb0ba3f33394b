//! Point endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::AppJson;
use crate::http::server::AppState;
use crate::models::{InsertedPoint, NewPoint, Point};

/// Point response, all columns
#[derive(Serialize)]
pub struct PointResponse {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub creator_id: String,
    pub created_at: String,
}

impl From<Point> for PointResponse {
    fn from(p: Point) -> Self {
        Self {
            id: p.id,
            latitude: p.latitude,
            longitude: p.longitude,
            category: p.category,
            creator_id: p.creator_id,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Create response. `created_at` is only present when the backend reports
/// the stored timestamp (the remote backend does, the embedded one does
/// not); the key is omitted entirely otherwise.
#[derive(Serialize)]
pub struct CreatedPoint {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<InsertedPoint> for CreatedPoint {
    fn from(inserted: InsertedPoint) -> Self {
        Self {
            id: inserted.id,
            created_at: inserted.created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

/// GET /api/points - list every point
async fn list_points(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PointResponse>>, ApiError> {
    let points = state.storage.list_points().await?;
    Ok(Json(points.into_iter().map(PointResponse::from).collect()))
}

/// POST /api/points - create a point
async fn create_point(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<NewPoint>,
) -> Result<(StatusCode, Json<CreatedPoint>), ApiError> {
    let inserted = state.storage.insert_point(&req).await?;
    Ok((StatusCode::CREATED, Json(CreatedPoint::from(inserted))))
}

/// Point routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/points", get(list_points).post(create_point))
}
