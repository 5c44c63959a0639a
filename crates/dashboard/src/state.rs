//! Application state shared across handlers.
//!
//! The session and the theme are context owned by the application shell:
//! both are set up once at startup and live until shutdown. Components
//! receive them through [`AppState`] rather than through globals.

use std::sync::Arc;

use ideafusion_core::{PostId, Session, Theme};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::api::BlogApiClient;
use crate::components::MobileMenu;
use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::services::PostListController;

/// Mutable view state shared by every page.
#[derive(Debug, Default)]
pub struct UiState {
    pub theme: Theme,
    pub menu: MobileMenu,
    /// Post marked for deletion, waiting for the user to confirm.
    pub pending_delete: Option<PostId>,
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    posts: PostListController<BlogApiClient>,
    ui: Mutex<UiState>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("posts", &self.inner.posts)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the blog API client cannot be created.
    pub fn new(config: DashboardConfig) -> Result<Self, AppError> {
        let api = BlogApiClient::new(&config.api)?;
        let shutdown = CancellationToken::new();
        let posts = PostListController::with_lifetime(Arc::new(api), shutdown.child_token());
        let ui = UiState {
            theme: config.theme,
            ..UiState::default()
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                posts,
                ui: Mutex::new(ui),
                shutdown,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Signed-in user, if any.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.inner.config.session.as_ref()
    }

    #[must_use]
    pub fn posts(&self) -> &PostListController<BlogApiClient> {
        &self.inner.posts
    }

    #[must_use]
    pub fn ui(&self) -> &Mutex<UiState> {
        &self.inner.ui
    }

    /// Token cancelled when the application shuts down.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown.clone()
    }

    /// Abandon in-flight API requests.
    pub fn teardown(&self) {
        self.inner.shutdown.cancel();
    }
}
