//! Session extractors for the dashboard.
//!
//! The session is injected through [`AppState`]; these extractors hand it to
//! route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use ideafusion_core::Session;

use crate::state::AppState;

/// Where signed-out users are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Extractor that optionally gets the signed-in user.
///
/// Never rejects; signed-out requests get `None`.
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().cloned()))
    }
}

/// Extractor that requires a session allowed to manage posts.
///
/// Signed-out users are redirected to sign in; signed-in users without the
/// admin flag get 403 Forbidden.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequirePostAdmin(session): RequirePostAdmin) -> impl IntoResponse {
///     format!("Managing posts for {}", session.user_id)
/// }
/// ```
pub struct RequirePostAdmin(pub Session);

/// Error returned when a post-management route is hit without permission.
#[derive(Debug)]
pub enum PostAdminRejection {
    /// Redirect to the sign-in page.
    RedirectToSignIn,
    /// Signed in, but not an admin.
    Forbidden,
}

impl IntoResponse for PostAdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to(SIGN_IN_PATH).into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequirePostAdmin {
    type Rejection = PostAdminRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state
            .session()
            .ok_or(PostAdminRejection::RedirectToSignIn)?;

        if !session.can_manage_posts() {
            tracing::warn!(user = %session.user_id, "Non-admin attempted post management");
            return Err(PostAdminRejection::Forbidden);
        }

        Ok(Self(session.clone()))
    }
}
