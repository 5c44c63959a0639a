//! Post list synchronisation.
//!
//! [`PostListController`] keeps a local, paginated window of one user's
//! posts in step with the blog API:
//!
//! 1. `initial_load` replaces the window with the first page
//! 2. `load_more` appends the next page, using the window length as offset
//! 3. `delete_record` removes a post locally once the API confirms the delete
//!
//! Failures never reach the caller. They are logged and the window is left as
//! it was. The window may drift from the server: offsets are not adjusted
//! after deletes and `has_more` is only recomputed when a page arrives.
//!
//! Every request races against the controller's cancellation token, so
//! responses that arrive after [`PostListController::teardown`] are dropped.
//! A load for a new owner starts a new generation; responses belonging to an
//! older generation are dropped as well.

use std::sync::Arc;

use ideafusion_core::{Post, PostId, Session, UserId};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiError, PostsApi};

/// Point-in-time copy of the controller state, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostListSnapshot {
    /// Owner the window was loaded for.
    pub owner: Option<UserId>,
    /// Posts in server order.
    pub items: Vec<Post>,
    /// Whether another page may exist.
    pub has_more: bool,
    /// Whether the initial load is outstanding.
    pub pending: bool,
}

#[derive(Debug)]
struct ListState {
    owner: Option<UserId>,
    items: Vec<Post>,
    has_more: bool,
    pending: bool,
    generation: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            owner: None,
            items: Vec::new(),
            has_more: true,
            pending: false,
            generation: 0,
        }
    }
}

/// Paginated, locally cached list of one user's posts.
///
/// Cloning is cheap; clones share the same window and lifetime.
pub struct PostListController<A> {
    api: Arc<A>,
    state: Arc<RwLock<ListState>>,
    lifetime: CancellationToken,
}

impl<A> Clone for PostListController<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
            lifetime: self.lifetime.clone(),
        }
    }
}

impl<A> std::fmt::Debug for PostListController<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostListController")
            .field("cancelled", &self.lifetime.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<A: PostsApi> PostListController<A> {
    /// Create a controller with its own lifetime.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self::with_lifetime(api, CancellationToken::new())
    }

    /// Create a controller whose requests are cancelled with `lifetime`.
    #[must_use]
    pub fn with_lifetime(api: Arc<A>, lifetime: CancellationToken) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(ListState::default())),
            lifetime,
        }
    }

    /// Current window, `has_more` and `pending` flags.
    pub async fn snapshot(&self) -> PostListSnapshot {
        let state = self.state.read().await;
        PostListSnapshot {
            owner: state.owner.clone(),
            items: state.items.clone(),
            has_more: state.has_more,
            pending: state.pending,
        }
    }

    /// Load the first page for the session's user, replacing the window.
    ///
    /// No-op unless the session may manage posts.
    #[instrument(skip_all, fields(owner = %session.user_id))]
    pub async fn initial_load(&self, session: &Session) {
        if let Some(generation) = self.begin_initial_load(session, true).await {
            self.finish_initial_load(session.user_id.clone(), generation)
                .await;
        }
    }

    /// Start the initial load in the background if the window does not
    /// already belong to the session's user.
    ///
    /// `pending` is set before this returns, so a render straight after sees
    /// the loading state. Returns the handle of the spawned load, if any.
    pub async fn ensure_loaded(&self, session: &Session) -> Option<JoinHandle<()>> {
        let generation = self.begin_initial_load(session, false).await?;
        let this = self.clone();
        let owner = session.user_id.clone();
        Some(tokio::spawn(async move {
            this.finish_initial_load(owner, generation).await;
        }))
    }

    /// Claim a new generation and mark the window pending.
    ///
    /// With `force == false` nothing happens when the window already belongs
    /// to the session's user.
    async fn begin_initial_load(&self, session: &Session, force: bool) -> Option<u64> {
        if !session.can_manage_posts() {
            debug!(user = %session.user_id, "Session cannot manage posts, skipping load");
            return None;
        }
        if self.lifetime.is_cancelled() {
            return None;
        }

        let mut state = self.state.write().await;
        if !force && state.owner.as_ref() == Some(&session.user_id) {
            return None;
        }

        state.generation += 1;
        state.owner = Some(session.user_id.clone());
        state.pending = true;
        Some(state.generation)
    }

    async fn finish_initial_load(&self, owner: UserId, generation: u64) {
        let result = tokio::select! {
            () = self.lifetime.cancelled() => {
                debug!("Controller torn down, dropping initial load");
                return;
            }
            result = self.api.get_posts(&owner, None) => result,
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(generation, current = state.generation, "Dropping stale initial load");
            return;
        }
        state.pending = false;

        match result {
            Ok(page) => {
                state.has_more = page.is_full();
                state.items = page.posts;
                info!(count = state.items.len(), has_more = state.has_more, "Posts loaded");
            }
            Err(e) => log_failure("initial_load", &e),
        }
    }

    /// Append the next page, using the current window length as offset.
    ///
    /// No fetch is issued when `has_more` is false, while the initial load is
    /// pending, or before any window was loaded. Overlapping calls can read the
    /// same offset and append the same page twice.
    #[instrument(skip_all)]
    pub async fn load_more(&self) {
        let (owner, start_index, generation) = {
            let state = self.state.read().await;
            if !state.has_more {
                debug!("No more posts, skipping fetch");
                return;
            }
            if state.pending {
                debug!("Initial load still pending, skipping fetch");
                return;
            }
            let Some(owner) = state.owner.clone() else {
                debug!("No window loaded yet, skipping fetch");
                return;
            };
            (owner, state.items.len(), state.generation)
        };

        let result = tokio::select! {
            () = self.lifetime.cancelled() => {
                debug!("Controller torn down, dropping page");
                return;
            }
            result = self.api.get_posts(&owner, Some(start_index)) => result,
        };

        let mut state = self.state.write().await;
        if state.generation != generation {
            debug!(generation, current = state.generation, "Dropping stale page");
            return;
        }

        match result {
            Ok(page) => {
                state.has_more = page.is_full();
                let fetched = page.posts.len();
                state.items.extend(page.posts);
                info!(start_index, fetched, has_more = state.has_more, "Appended posts page");
            }
            Err(e) => log_failure("load_more", &e),
        }
    }

    /// Delete a post that the user has confirmed, then drop it from the window.
    ///
    /// The window only changes after the API confirms. `has_more` is left as
    /// it was.
    #[instrument(skip_all, fields(post = %id))]
    pub async fn delete_record(&self, id: &PostId) {
        let Some(owner) = self.state.read().await.owner.clone() else {
            warn!("Delete requested before any window was loaded");
            return;
        };

        let result = tokio::select! {
            () = self.lifetime.cancelled() => {
                debug!("Controller torn down, dropping delete");
                return;
            }
            result = self.api.delete_post(id, &owner) => result,
        };

        match result {
            Ok(()) => {
                let mut state = self.state.write().await;
                let before = state.items.len();
                state.items.retain(|post| &post.id != id);
                info!(removed = before - state.items.len(), "Post deleted");
            }
            Err(e) => log_failure("delete_record", &e),
        }
    }

    /// Abandon all in-flight requests. Their results will never be applied.
    pub fn teardown(&self) {
        if !self.lifetime.is_cancelled() {
            debug!("Tearing down post list controller");
            self.lifetime.cancel();
        }
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }
}

/// Record a swallowed API failure.
fn log_failure(operation: &'static str, err: &ApiError) {
    match err.server_message() {
        Some(message) => warn!(operation, server_message = message, "Blog API rejected request"),
        None => error!(operation, error = %err, "Blog API request failed"),
    }
}
