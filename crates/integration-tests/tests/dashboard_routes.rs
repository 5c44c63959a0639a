//! Dashboard routes driven in-process with `tower::ServiceExt::oneshot`.
//!
//! The blog API behind the dashboard is the in-memory fake from the crate
//! library.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use ideafusion_core::{Session, Theme};
use ideafusion_dashboard::{AppState, app};
use ideafusion_integration_tests::{FakeBlog, dashboard_state, sample_posts};
use tower::ServiceExt;

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app(state.clone()), request).await
}

async fn post(state: &AppState, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app(state.clone()), request).await
}

/// Load the window up front so the page renders the table, not the spinner.
async fn loaded_admin(blog: &FakeBlog) -> AppState {
    let state = dashboard_state(blog, Some(("u1", true)));
    state.posts().initial_load(&Session::new("u1", true)).await;
    state
}

#[tokio::test]
async fn test_health() {
    let blog = FakeBlog::spawn(Vec::new()).await;
    let state = dashboard_state(&blog, None);

    let (status, _, body) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let blog = FakeBlog::spawn(Vec::new()).await;
    let state = dashboard_state(&blog, None);

    let (status, location, _) = get(&state, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let blog = FakeBlog::spawn(Vec::new()).await;
    let state = dashboard_state(&blog, None);

    let (status, _, _) = get(&state, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_header_signed_in_and_out() {
    let blog = FakeBlog::spawn(Vec::new()).await;

    let signed_out = dashboard_state(&blog, None);
    let (_, _, body) = get(&signed_out, "/dashboard").await;
    assert!(body.contains("IdeaFusion&#39;s") || body.contains("IdeaFusion's"));
    assert!(body.contains("Search..."));
    assert!(body.contains("Sign in"));
    assert!(!body.contains("Sign out"));

    let signed_in = dashboard_state(&blog, Some(("u1", false)));
    let (_, _, body) = get(&signed_in, "/dashboard").await;
    assert!(body.contains("Sign out"));
    assert!(body.contains("ada@example.com"));
}

#[tokio::test]
async fn test_tab_selection() {
    let blog = FakeBlog::spawn(sample_posts("u1", 2)).await;
    let state = loaded_admin(&blog).await;

    let (status, _, body) = get(&state, "/dashboard?tab=profile").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Profile</h1>"));
    assert!(!body.contains("posts-table"));

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(body.contains("posts-table"));
    assert!(!body.contains("<h1>Profile</h1>"));

    for uri in ["/dashboard", "/dashboard?tab=settings", "/dashboard?tab="] {
        let (status, _, body) = get(&state, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(!body.contains("<h1>Profile</h1>"), "{uri}");
        assert!(!body.contains("posts-panel"), "{uri}");
    }
}

#[tokio::test]
async fn test_posts_table_rows_and_show_more() {
    let blog = FakeBlog::spawn(sample_posts("u1", 11)).await;
    let state = loaded_admin(&blog).await;

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(body.contains("Date updated"));
    assert!(body.contains("Post 9"));
    assert!(!body.contains("Post 10"));
    assert!(body.contains("/post/post-1"));
    assert!(body.contains("/update-post/p1"));
    assert!(body.contains("Show more"));

    let (status, location, _) = post(&state, "/dashboard/posts/more", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/dashboard?tab=posts"));

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(body.contains("Post 11"));
    assert!(!body.contains("Show more"));
    // The page was served from the window, not refetched.
    assert_eq!(blog.get_offsets(), vec![None, Some(9)]);
}

#[tokio::test]
async fn test_first_visit_starts_load() {
    let blog = FakeBlog::spawn(sample_posts("u1", 3)).await;
    let state = dashboard_state(&blog, Some(("u1", true)));

    let (status, _, _) = get(&state, "/dashboard?tab=posts").await;
    assert_eq!(status, StatusCode::OK);

    // The load runs in the background; wait for it to settle.
    for _ in 0..50 {
        if !state.posts().snapshot().await.pending {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(body.contains("Post 3"));
    assert!(!body.contains("http-equiv=\"refresh\""));
    assert_eq!(blog.get_offsets(), vec![None]);
}

#[tokio::test]
async fn test_empty_state_for_non_admin() {
    let blog = FakeBlog::spawn(sample_posts("u1", 3)).await;
    let state = dashboard_state(&blog, Some(("u1", false)));

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(body.contains("You have not posts"));
    assert!(!body.contains("Post 1"));
    assert!(blog.requests().is_empty());
}

#[tokio::test]
async fn test_delete_flow() {
    let blog = FakeBlog::spawn(sample_posts("u1", 3)).await;
    let state = loaded_admin(&blog).await;

    let (status, location, _) = post(&state, "/dashboard/posts/p2/delete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/dashboard?tab=posts"));

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(body.contains("Are you sure you want to delete this post?"));

    post(&state, "/dashboard/posts/confirm-delete", "").await;

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(!body.contains("Are you sure you want to delete this post?"));
    assert!(!body.contains("Post 2"));
    assert!(body.contains("Post 3"));
    assert_eq!(blog.stored_ids("u1"), vec!["p1", "p3"]);
}

#[tokio::test]
async fn test_cancel_delete_keeps_post() {
    let blog = FakeBlog::spawn(sample_posts("u1", 2)).await;
    let state = loaded_admin(&blog).await;

    post(&state, "/dashboard/posts/p1/delete", "").await;
    post(&state, "/dashboard/posts/cancel-delete", "").await;

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(!body.contains("Are you sure you want to delete this post?"));
    assert!(body.contains("Post 1"));

    // Confirming with nothing marked deletes nothing.
    post(&state, "/dashboard/posts/confirm-delete", "").await;
    assert_eq!(blog.stored_ids("u1").len(), 2);
}

#[tokio::test]
async fn test_leaving_posts_tab_drops_marked_delete() {
    let blog = FakeBlog::spawn(sample_posts("u1", 2)).await;
    let state = loaded_admin(&blog).await;

    post(&state, "/dashboard/posts/p1/delete", "").await;
    get(&state, "/dashboard?tab=profile").await;

    let (_, _, body) = get(&state, "/dashboard?tab=posts").await;
    assert!(!body.contains("Are you sure you want to delete this post?"));
    assert!(state.ui().lock().await.pending_delete.is_none());

    post(&state, "/dashboard/posts/confirm-delete", "").await;
    assert_eq!(blog.stored_ids("u1").len(), 2);
}

#[tokio::test]
async fn test_post_actions_require_admin() {
    let blog = FakeBlog::spawn(sample_posts("u1", 2)).await;

    let member = dashboard_state(&blog, Some(("u1", false)));
    let (status, _, _) = post(&member, "/dashboard/posts/more", "").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _, _) = post(&member, "/dashboard/posts/p1/delete", "").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let signed_out = dashboard_state(&blog, None);
    let (status, location, _) = post(&signed_out, "/dashboard/posts/confirm-delete", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/sign-in"));

    assert_eq!(blog.stored_ids("u1").len(), 2);
}

#[tokio::test]
async fn test_theme_toggle_returns_to_page() {
    let blog = FakeBlog::spawn(Vec::new()).await;
    let state = dashboard_state(&blog, None);
    assert_eq!(state.ui().lock().await.theme, Theme::Light);

    let (status, location, _) = post(
        &state,
        "/theme/toggle",
        "return_to=%2Fdashboard%3Ftab%3Dprofile",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/dashboard?tab=profile"));
    assert_eq!(state.ui().lock().await.theme, Theme::Dark);

    let (_, _, body) = get(&state, "/dashboard").await;
    assert!(body.contains("theme-dark"));

    let (_, location, _) = post(&state, "/theme/toggle", "return_to=https%3A%2F%2Fevil.example").await;
    assert_eq!(location.as_deref(), Some("/dashboard"));
    assert_eq!(state.ui().lock().await.theme, Theme::Light);
}

#[tokio::test]
async fn test_mobile_menu_open_and_close() {
    let blog = FakeBlog::spawn(Vec::new()).await;
    let state = dashboard_state(&blog, None);

    // Render once so the location is known.
    get(&state, "/dashboard").await;

    post(&state, "/menu/open", "return_to=%2Fdashboard").await;
    let (_, _, body) = get(&state, "/dashboard").await;
    assert!(body.contains("Close menu"));

    post(&state, "/menu/close", "return_to=%2Fdashboard").await;
    let (_, _, body) = get(&state, "/dashboard").await;
    assert!(body.contains("Open menu"));
}

#[tokio::test]
async fn test_menu_opens_long_after_navigation() {
    let blog = FakeBlog::spawn(Vec::new()).await;
    let state = dashboard_state(&blog, None);

    get(&state, "/dashboard").await;
    // Past the auto-close delay with no render in between.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    post(&state, "/menu/open", "return_to=%2Fdashboard").await;
    let (_, _, body) = get(&state, "/dashboard").await;
    assert!(body.contains("Close menu"));
}
