//! HTTP handlers for the registration web form.
//!
//! Same save/list core as the JSON API, rendered as HTML pages instead.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::adapters::http::profile::ProfileAppState;
use crate::application::handlers::profile::{ListProfilesQuery, SaveProfileCommand};
use crate::domain::profile::{Profile, INVALID_PROFILE_MESSAGE};

use super::{flash, views};

pub const REGISTERED_MESSAGE: &str = "Profile registered successfully!";
pub const SAVE_FAILED_PAGE_MESSAGE: &str =
    "An error occurred while saving the profile. Please try again.";
pub const LIST_FAILED_PAGE_MESSAGE: &str =
    "An error occurred while retrieving profiles. Please try again.";

/// GET / - Send visitors to the profile pages
pub async fn home() -> Redirect {
    Redirect::to("/profile")
}

/// GET /profile - Landing page; shows and clears the flash message
pub async fn index(headers: HeaderMap) -> Response {
    match flash::read(&headers) {
        Some(message) => (
            [(SET_COOKIE, flash::clear_cookie())],
            Html(views::index(Some(&message))),
        )
            .into_response(),
        None => Html(views::index(None)).into_response(),
    }
}

/// GET /profile/register - Empty registration form
pub async fn register_form() -> Html<String> {
    Html(views::register(&Profile::default(), None))
}

/// POST /profile/register - Submit the registration form
pub async fn register(State(state): State<ProfileAppState>, body: Bytes) -> Response {
    tracing::info!("Profile registration form submitted");

    let parsed = std::str::from_utf8(&body)
        .ok()
        .map(Profile::from_form_body);

    let profile = match parsed {
        Some(Ok(profile)) => profile,
        Some(Err(err)) => {
            return (
                StatusCode::BAD_REQUEST,
                Html(views::register(&Profile::default(), Some(err.message()))),
            )
                .into_response();
        }
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Html(views::register(&Profile::default(), Some(INVALID_PROFILE_MESSAGE))),
            )
                .into_response();
        }
    };

    let result = state
        .save_profile_handler()
        .handle(SaveProfileCommand {
            profile: profile.clone(),
        })
        .await;

    match result {
        Ok(_) => (
            [(SET_COOKIE, flash::set_cookie(REGISTERED_MESSAGE))],
            Redirect::to("/profile"),
        )
            .into_response(),
        Err(err) if err.is_client_error() => (
            StatusCode::BAD_REQUEST,
            Html(views::register(&profile, Some(err.message()))),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::register(&profile, Some(SAVE_FAILED_PAGE_MESSAGE))),
        )
            .into_response(),
    }
}

/// GET /profile/all - Table of every stored profile
pub async fn all_profiles(State(state): State<ProfileAppState>) -> Response {
    tracing::info!("Retrieving all profiles for the web view");

    match state.list_profiles_handler().handle(ListProfilesQuery).await {
        Ok(result) => Html(views::all_profiles(&result.profiles, None)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::all_profiles(&[], Some(LIST_FAILED_PAGE_MESSAGE))),
        )
            .into_response(),
    }
}
