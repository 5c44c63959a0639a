//! Header actions: theme toggle and mobile menu.

use std::time::Instant;

use axum::{Form, extract::State, response::Redirect};
use tracing::instrument;

use super::ReturnTo;
use crate::state::AppState;

/// Flip between light and dark.
#[instrument(skip_all)]
pub async fn toggle_theme(State(state): State<AppState>, Form(form): Form<ReturnTo>) -> Redirect {
    let mut ui = state.ui().lock().await;
    ui.theme = ui.theme.toggle();
    tracing::debug!(theme = %ui.theme, "Theme toggled");
    form.redirect()
}

#[instrument(skip_all)]
pub async fn open_menu(State(state): State<AppState>, Form(form): Form<ReturnTo>) -> Redirect {
    state.ui().lock().await.menu.open(Instant::now());
    form.redirect()
}

#[instrument(skip_all)]
pub async fn close_menu(State(state): State<AppState>, Form(form): Form<ReturnTo>) -> Redirect {
    state.ui().lock().await.menu.close();
    form.redirect()
}
