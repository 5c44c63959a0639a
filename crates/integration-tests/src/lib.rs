//! Integration tests for the IdeaFusion dashboard.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ideafusion-integration-tests
//! ```
//!
//! No external services are needed: [`FakeBlog`] serves the two blog API
//! endpoints the dashboard calls from an in-memory post list, bound to an
//! ephemeral localhost port.
//!
//! # Test Categories
//!
//! - `post_list_sync` - Controller driven through the real HTTP client
//! - `dashboard_routes` - Dashboard router driven with `tower::ServiceExt::oneshot`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use ideafusion_core::{POSTS_PAGE_SIZE, Post, PostId, PostsPage, UserId};
use ideafusion_dashboard::{AppState, DashboardConfig, config::ConfigError};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinHandle;
use url::Url;

/// Access token the fake expects in the `access_token` cookie.
pub const TEST_ACCESS_TOKEN: &str = "k9Qz-integration-Tok3n-xV7w";

/// A request observed by the fake blog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedRequest {
    GetPosts {
        user_id: String,
        start_index: Option<usize>,
        cookie: Option<String>,
    },
    DeletePost {
        post_id: String,
        user_id: String,
        cookie: Option<String>,
    },
}

#[derive(Debug, Default)]
struct FakeBlogState {
    posts: Mutex<Vec<Post>>,
    requests: Mutex<Vec<RecordedRequest>>,
    reject_deletes: AtomicBool,
    fail_gets: AtomicBool,
}

/// In-memory stand-in for the blog API.
///
/// Pages of [`POSTS_PAGE_SIZE`] are cut from the owner's posts in insertion
/// order, starting at `startIndex`.
#[derive(Debug)]
pub struct FakeBlog {
    addr: SocketAddr,
    state: Arc<FakeBlogState>,
    server: JoinHandle<()>,
}

impl FakeBlog {
    /// Start the fake on an ephemeral localhost port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn spawn(posts: Vec<Post>) -> Self {
        let state = Arc::new(FakeBlogState {
            posts: Mutex::new(posts),
            ..FakeBlogState::default()
        });

        let router = Router::new()
            .route("/api/post/getposts", get(get_posts))
            .route(
                "/api/post/deletepost/{post_id}/{user_id}",
                delete(delete_post),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake blog API");
        let addr = listener.local_addr().expect("Failed to read local address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the fake, suitable for `BLOG_API_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer every delete with 403 and a server message.
    pub fn reject_deletes(&self, reject: bool) {
        self.state.reject_deletes.store(reject, Ordering::SeqCst);
    }

    /// Answer every list request with 500.
    pub fn fail_gets(&self, fail: bool) {
        self.state.fail_gets.store(fail, Ordering::SeqCst);
    }

    /// Posts currently stored for `owner`.
    #[must_use]
    pub fn stored_ids(&self, owner: &str) -> Vec<String> {
        lock(&self.state.posts)
            .iter()
            .filter(|post| post.user_id.as_str() == owner)
            .map(|post| post.id.to_string())
            .collect()
    }

    /// Every request seen so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// `startIndex` of every list request, oldest first.
    #[must_use]
    pub fn get_offsets(&self) -> Vec<Option<usize>> {
        self.requests()
            .into_iter()
            .filter_map(|request| match request {
                RecordedRequest::GetPosts { start_index, .. } => Some(start_index),
                RecordedRequest::DeletePost { .. } => None,
            })
            .collect()
    }
}

impl Drop for FakeBlog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn access_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(name, _)| *name == "access_token")
                .map(|(_, value)| value.to_string())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPostsQuery {
    user_id: String,
    start_index: Option<usize>,
}

async fn get_posts(
    State(state): State<Arc<FakeBlogState>>,
    headers: HeaderMap,
    Query(query): Query<GetPostsQuery>,
) -> Response {
    lock(&state.requests).push(RecordedRequest::GetPosts {
        user_id: query.user_id.clone(),
        start_index: query.start_index,
        cookie: access_cookie(&headers),
    });

    if state.fail_gets.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Database unavailable" })),
        )
            .into_response();
    }

    let owned: Vec<Post> = lock(&state.posts)
        .iter()
        .filter(|post| post.user_id.as_str() == query.user_id)
        .cloned()
        .collect();

    let page = PostsPage {
        total_posts: Some(owned.len() as u64),
        last_month_posts: Some(0),
        posts: owned
            .into_iter()
            .skip(query.start_index.unwrap_or(0))
            .take(POSTS_PAGE_SIZE)
            .collect(),
    };

    Json(page).into_response()
}

async fn delete_post(
    State(state): State<Arc<FakeBlogState>>,
    headers: HeaderMap,
    Path((post_id, user_id)): Path<(String, String)>,
) -> Response {
    lock(&state.requests).push(RecordedRequest::DeletePost {
        post_id: post_id.clone(),
        user_id: user_id.clone(),
        cookie: access_cookie(&headers),
    });

    if state.reject_deletes.load(Ordering::SeqCst) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "You are not allowed to delete this post" })),
        )
            .into_response();
    }

    let mut posts = lock(&state.posts);
    let before = posts.len();
    posts.retain(|post| !(post.id.as_str() == post_id && post.user_id.as_str() == user_id));

    if posts.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Post not found" })),
        )
            .into_response();
    }

    Json(json!("The post has been deleted")).into_response()
}

// =============================================================================
// Fixtures
// =============================================================================

fn fixture_time(offset_days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::days(offset_days)
}

/// A post with predictable fields: id `p{n}`, title `Post {n}`.
#[must_use]
pub fn sample_post(owner: &str, n: usize) -> Post {
    Post {
        id: PostId::new(format!("p{n}")),
        user_id: UserId::new(owner),
        title: format!("Post {n}"),
        slug: format!("post-{n}"),
        category: "rust".to_string(),
        image: format!("https://images.example.com/{n}.png"),
        content: Some(format!("<p>Body of post {n}</p>")),
        created_at: Some(fixture_time(0)),
        updated_at: fixture_time(i64::try_from(n).unwrap_or_default()),
    }
}

/// Posts `p1..=pcount` owned by `owner`.
#[must_use]
pub fn sample_posts(owner: &str, count: usize) -> Vec<Post> {
    (1..=count).map(|n| sample_post(owner, n)).collect()
}

/// Dashboard configuration pointing at `base_url`, built through the same
/// environment lookup the binary uses.
///
/// `session` is `(user id, is admin)`; `None` renders signed out.
///
/// # Errors
///
/// Returns error if the configuration is rejected.
pub fn dashboard_config(
    base_url: &str,
    session: Option<(&str, bool)>,
) -> Result<DashboardConfig, ConfigError> {
    let mut env: HashMap<&str, String> = HashMap::from([
        ("BLOG_API_URL", base_url.to_string()),
        ("BLOG_ACCESS_TOKEN", TEST_ACCESS_TOKEN.to_string()),
        ("BLOG_API_TIMEOUT_SECS", "5".to_string()),
    ]);

    if let Some((user_id, is_admin)) = session {
        env.insert("SESSION_USER_ID", user_id.to_string());
        env.insert("SESSION_IS_ADMIN", is_admin.to_string());
        env.insert("SESSION_USERNAME", "ada".to_string());
        env.insert("SESSION_EMAIL", "ada@example.com".to_string());
    }

    DashboardConfig::from_lookup(|key: &str| env.get(key).cloned())
}

/// Application state wired to `blog`.
///
/// # Panics
///
/// Panics if the configuration or state cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn dashboard_state(blog: &FakeBlog, session: Option<(&str, bool)>) -> AppState {
    let config = dashboard_config(&blog.base_url(), session).expect("valid test configuration");
    AppState::new(config).expect("application state")
}

/// A base URL nothing listens on.
///
/// # Panics
///
/// Panics if no port can be reserved.
#[allow(clippy::expect_used)]
pub async fn unreachable_base_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("valid URL")
}
