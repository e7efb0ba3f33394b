//! Post endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::AppJson;
use crate::http::server::AppState;
use crate::models::{NewPost, Post};

/// Post response, all columns
#[derive(Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub name: String,
    pub current_lat: f64,
    pub current_lng: f64,
    pub target_lat: Option<f64>,
    pub target_lng: Option<f64>,
    pub created_at: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            name: p.name,
            current_lat: p.current_lat,
            current_lng: p.current_lng,
            target_lat: p.target_lat,
            target_lng: p.target_lng,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Create response
#[derive(Serialize)]
pub struct CreatedPost {
    pub id: i64,
}

/// GET /api/posts - list every post
async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.storage.list_posts().await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// POST /api/posts - create a post
async fn create_post(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<NewPost>,
) -> Result<(StatusCode, Json<CreatedPost>), ApiError> {
    let id = state.storage.insert_post(&req).await?;
    Ok((StatusCode::CREATED, Json(CreatedPost { id })))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/posts", get(list_posts).post(create_post))
}

#[cfg(test)]
mod tests {
    use crate::http::server::testing::test_router;
    use crate::http::server::Service;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn post_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/posts")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_list_returns_empty_array() {
        let (app, _dir) = test_router(Service::Posts).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/posts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn create_then_list_roundtrip() {
        let (app, _dir) = test_router(Service::Posts).await;

        let response = app
            .clone()
            .oneshot(post_request(
                r#"{"name": "Ramp A", "current_lat": 1.0, "current_lng": 2.0,
                    "target_lat": 3.0, "target_lng": 4.0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_i64().expect("integer id");
        assert!(id > 0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/posts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], id);
        assert_eq!(listed[0]["name"], "Ramp A");
        assert_eq!(listed[0]["current_lat"], 1.0);
        assert_eq!(listed[0]["target_lng"], 4.0);
    }

    #[tokio::test]
    async fn omitted_targets_list_as_null() {
        let (app, _dir) = test_router(Service::Posts).await;

        let response = app
            .clone()
            .oneshot(post_request(
                r#"{"name": "Ramp A", "current_lat": 1.0, "current_lng": 2.0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/posts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert!(listed[0]["target_lat"].is_null());
        assert!(listed[0]["target_lng"].is_null());
    }

    #[tokio::test]
    async fn missing_name_is_400_and_writes_nothing() {
        let (app, _dir) = test_router(Service::Posts).await;

        let response = app
            .clone()
            .oneshot(post_request(r#"{"current_lat": 1.0, "current_lng": 2.0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/posts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, _dir) = test_router(Service::Posts).await;
        let response = app
            .oneshot(post_request("{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
