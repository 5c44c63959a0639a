//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Health check
//! GET  /                               - Redirect to the dashboard
//!
//! # Dashboard
//! GET  /dashboard?tab=<tab>            - Dashboard shell (profile | posts)
//!
//! # Posts (admin only)
//! POST /dashboard/posts/more           - Load the next page
//! POST /dashboard/posts/{id}/delete    - Mark a post for deletion
//! POST /dashboard/posts/confirm-delete - Delete the marked post
//! POST /dashboard/posts/cancel-delete  - Unmark
//!
//! # Header
//! POST /theme/toggle                   - Flip light/dark
//! POST /menu/open                      - Open the mobile menu
//! POST /menu/close                     - Close the mobile menu
//! ```

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;

use crate::{error::AppError, state::AppState};

pub mod dashboard;
pub mod posts;
pub mod preferences;

/// Where header actions return to when no valid location was sent.
const DEFAULT_RETURN_PATH: &str = "/dashboard";

/// Static assets, relative to the workspace root.
const STATIC_DIR: &str = "crates/dashboard/static";

/// Build the route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(home))
        .route("/dashboard", get(dashboard::index))
        .route("/dashboard/posts/more", post(posts::load_more))
        .route("/dashboard/posts/confirm-delete", post(posts::confirm_delete))
        .route("/dashboard/posts/cancel-delete", post(posts::cancel_delete))
        .route("/dashboard/posts/{id}/delete", post(posts::mark_delete))
        .route("/theme/toggle", post(preferences::toggle_theme))
        .route("/menu/open", post(preferences::open_menu))
        .route("/menu/close", post(preferences::close_menu))
}

/// Routes bound to state, with static assets and a not-found fallback.
pub fn app(state: AppState) -> Router {
    routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the blog API.
async fn health() -> &'static str {
    "ok"
}

async fn home() -> Redirect {
    Redirect::to(DEFAULT_RETURN_PATH)
}

pub async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}

/// Form field carrying the location a header action came from.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnTo {
    pub return_to: Option<String>,
}

impl ReturnTo {
    /// Redirect back to the sending page.
    #[must_use]
    pub fn redirect(&self) -> Redirect {
        Redirect::to(safe_return_path(self.return_to.as_deref()))
    }
}

/// Accept only same-site absolute paths, falling back to the dashboard.
#[must_use]
pub fn safe_return_path(raw: Option<&str>) -> &str {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => DEFAULT_RETURN_PATH,
    }
}
