//! Dashboard shell: sidebar tabs plus the profile or posts sub-view.

use std::time::Instant;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{OriginalUri, Query, State};
use ideafusion_core::Session;
use tracing::instrument;

use crate::{
    components::{
        DashboardQuery, DashboardTab, HeaderView, PostsPanelView, TabLink, header::AccountView,
        tab_links,
    },
    filters,
    middleware::CurrentSession,
    state::AppState,
};

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub header: HeaderView,
    pub tabs: Vec<TabLink>,
    pub show_profile: bool,
    pub profile: Option<AccountView>,
    pub posts: Option<PostsPanelView>,
    /// Reload the page shortly, used while the initial load is in flight.
    pub refresh: bool,
}

/// Dashboard page handler.
///
/// Rendering the posts tab starts the initial load for the signed-in owner
/// when it has not happened yet. The page polls until the load settles.
#[instrument(skip_all, fields(tab = ?query.tab))]
pub async fn index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<DashboardQuery>,
) -> DashboardTemplate {
    let selected = query.selected();
    let location = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    let (theme, menu_open, pending_delete) = {
        let now = Instant::now();
        let mut ui = state.ui().lock().await;
        ui.menu.observe_location(&location, now);
        if selected != Some(DashboardTab::Posts) {
            // The confirm modal belongs to the posts view and does not outlive it.
            ui.pending_delete = None;
        }
        (ui.theme, ui.menu.is_open(now), ui.pending_delete.clone())
    };

    let posts = if selected == Some(DashboardTab::Posts) {
        let mut panel = posts_panel(&state, session.as_ref()).await;
        panel.confirm_delete = pending_delete.map(|id| id.to_string());
        Some(panel)
    } else {
        None
    };

    let show_profile = selected == Some(DashboardTab::Profile);
    let refresh = posts.as_ref().is_some_and(|panel| panel.loading);

    DashboardTemplate {
        header: HeaderView::new(theme, session.as_ref(), uri.path(), &location, menu_open),
        tabs: tab_links(selected),
        show_profile,
        profile: session
            .as_ref()
            .filter(|_| show_profile)
            .map(AccountView::from),
        posts,
        refresh,
    }
}

async fn posts_panel(state: &AppState, session: Option<&Session>) -> PostsPanelView {
    let controller = state.posts();

    if let Some(session) = session.filter(|s| s.can_manage_posts()) {
        // Not awaited; the spinner covers the pending window.
        if controller.ensure_loaded(session).await.is_some() {
            tracing::debug!(owner = %session.user_id, "Initial posts load started");
        }
    }

    let snapshot = controller.snapshot().await;
    PostsPanelView::from_snapshot(&snapshot, session.is_some_and(Session::can_manage_posts))
}
