//! Axum router configuration for profile API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health_check, list_profiles, save_profile, ProfileAppState};

/// Create the profile API router.
///
/// # Routes
/// - `GET /test` - Liveness check
/// - `POST /save` - Register a profile
/// - `GET /all` - List every stored profile
pub fn profile_routes() -> Router<ProfileAppState> {
    Router::new()
        .route("/test", get(health_check))
        .route("/save", post(save_profile))
        .route("/all", get(list_profiles))
}

/// Create the profile API router mounted at `/api/profile`.
pub fn profile_api_router() -> Router<ProfileAppState> {
    Router::new().nest("/api/profile", profile_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::table::{InMemoryTableStore, TableProfileStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = TableProfileStore::new(Arc::new(InMemoryTableStore::new())).unwrap();
        profile_api_router().with_state(ProfileAppState::new(Arc::new(store)))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_endpoint_reports_working() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/profile/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "API is working!");
    }

    #[tokio::test]
    async fn empty_body_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/profile/save")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Request body is empty");
    }

    #[tokio::test]
    async fn list_before_any_save_is_empty() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/profile/all")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["count"], 0);
        assert_eq!(json["profiles"], Value::Array(vec![]));
    }

    #[tokio::test]
    async fn save_rejects_get() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/profile/save")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
