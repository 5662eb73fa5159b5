//! Route configuration for the registration web form.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::profile::ProfileAppState;

use super::handlers::{all_profiles, home, index, register, register_form};

/// Creates the web form router.
///
/// Routes:
/// - `GET /` - Redirect to `/profile`
/// - `GET /profile` - Landing page
/// - `GET /profile/register` - Registration form
/// - `POST /profile/register` - Submit registration
/// - `GET /profile/all` - All profiles
pub fn web_router() -> Router<ProfileAppState> {
    Router::new()
        .route("/", get(home))
        .route("/profile", get(index))
        .route("/profile/register", get(register_form).post(register))
        .route("/profile/all", get(all_profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::table::{InMemoryTableStore, TableProfileStore};
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::profile::ProfileRecord;
    use crate::ports::ProfileStore;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FailingStore;

    #[async_trait]
    impl ProfileStore for FailingStore {
        async fn ensure_table(&self) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "Service unavailable"))
        }

        async fn insert(&self, _record: &ProfileRecord) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "Service unavailable"))
        }

        async fn scan_all(&self) -> Result<Vec<ProfileRecord>, DomainError> {
            Err(DomainError::new(ErrorCode::DatabaseError, "Service unavailable"))
        }
    }

    fn app() -> Router {
        let store = TableProfileStore::new(Arc::new(InMemoryTableStore::new())).unwrap();
        web_router().with_state(ProfileAppState::new(Arc::new(store)))
    }

    fn failing_app() -> Router {
        web_router().with_state(ProfileAppState::new(Arc::new(FailingStore)))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/profile/register")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_profile() {
        let response = app().oneshot(get("/")).await.unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[LOCATION], "/profile");
    }

    #[tokio::test]
    async fn register_form_renders() {
        let response = app().oneshot(get("/profile/register")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text(response).await.contains("<form"));
    }

    #[tokio::test]
    async fn successful_registration_redirects_with_flash() {
        let app = app();
        let response = app
            .clone()
            .oneshot(post_form("Name=John&Surname=Doe&Email=john.doe%40example.com&Age=30"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/profile");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("profile_flash="));

        let pair = cookie.split(';').next().unwrap().to_string();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/profile")
                    .header(COOKIE, pair)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
        assert!(text(response).await.contains("Profile registered successfully!"));

        let listing = text(app.oneshot(get("/profile/all")).await.unwrap()).await;
        assert!(listing.contains("john.doe@example.com"));
    }

    #[tokio::test]
    async fn empty_form_rerenders_with_error() {
        let response = app().oneshot(post_form("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(text(response).await.contains("Invalid profile data"));
    }

    #[tokio::test]
    async fn storage_failure_rerenders_with_entered_values() {
        let response = failing_app()
            .oneshot(post_form("Name=Ada&Surname=Lovelace&Email=ada%40example.com&Age=36"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let page = text(response).await;
        assert!(page.contains("An error occurred while saving the profile. Please try again."));
        assert!(page.contains(r#"value="Lovelace""#));
    }

    #[tokio::test]
    async fn listing_without_table_is_empty() {
        let response = app().oneshot(get("/profile/all")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text(response).await.contains("No profiles have been registered yet."));
    }

    #[tokio::test]
    async fn listing_failure_shows_error_page() {
        let response = failing_app().oneshot(get("/profile/all")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(text(response)
            .await
            .contains("An error occurred while retrieving profiles. Please try again."));
    }
}
