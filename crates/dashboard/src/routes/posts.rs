//! Post management actions for the posts tab.
//!
//! Every action is admin-only and redirects back to the posts tab, which
//! renders the controller's window as it stands after the action.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use ideafusion_core::PostId;
use tracing::instrument;

use crate::{middleware::RequirePostAdmin, state::AppState};

/// Location of the posts tab.
pub const POSTS_TAB_PATH: &str = "/dashboard?tab=posts";

/// Fetch the next page and append it to the window.
#[instrument(skip_all, fields(owner = %session.user_id))]
pub async fn load_more(
    RequirePostAdmin(session): RequirePostAdmin,
    State(state): State<AppState>,
) -> Redirect {
    state.posts().load_more().await;
    Redirect::to(POSTS_TAB_PATH)
}

/// Mark a post for deletion and open the confirmation modal.
#[instrument(skip_all, fields(owner = %session.user_id, post = %id))]
pub async fn mark_delete(
    RequirePostAdmin(session): RequirePostAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Redirect {
    state.ui().lock().await.pending_delete = Some(PostId::new(id));
    Redirect::to(POSTS_TAB_PATH)
}

/// Delete the marked post.
///
/// The modal closes before the request goes out, so a failed delete leaves
/// the row in place with no modal.
#[instrument(skip_all, fields(owner = %session.user_id))]
pub async fn confirm_delete(
    RequirePostAdmin(session): RequirePostAdmin,
    State(state): State<AppState>,
) -> Redirect {
    let marked = state.ui().lock().await.pending_delete.take();

    match marked {
        Some(id) => state.posts().delete_record(&id).await,
        None => tracing::debug!("Delete confirmed with no post marked"),
    }

    Redirect::to(POSTS_TAB_PATH)
}

/// Close the confirmation modal without deleting.
#[instrument(skip_all, fields(owner = %session.user_id))]
pub async fn cancel_delete(
    RequirePostAdmin(session): RequirePostAdmin,
    State(state): State<AppState>,
) -> Redirect {
    state.ui().lock().await.pending_delete = None;
    Redirect::to(POSTS_TAB_PATH)
}
