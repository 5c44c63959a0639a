//! HTTP client for the blog REST API.
//!
//! Only the two post-management endpoints the dashboard needs:
//!
//! ```text
//! GET    /api/post/getposts?userId=<id>[&startIndex=<n>]
//! DELETE /api/post/deletepost/<postId>/<userId>
//! ```

use std::future::Future;

use ideafusion_core::{DeletePostResponse, PostId, PostsPage, UserId};
use reqwest::{Client, RequestBuilder, Response, header};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::error::ApiError;
use crate::config::BlogApiConfig;

/// Name of the cookie the blog backend reads its session token from.
const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Remote post collection.
///
/// Implemented by [`BlogApiClient`] over HTTP and by in-memory fakes in tests.
pub trait PostsApi: Send + Sync + 'static {
    /// Fetch one page of posts owned by `owner`, most recently updated first.
    ///
    /// `start_index` is an offset into the owner's collection; `None` means
    /// the first page.
    fn get_posts(
        &self,
        owner: &UserId,
        start_index: Option<usize>,
    ) -> impl Future<Output = Result<PostsPage, ApiError>> + Send;

    /// Delete a post on behalf of `owner`.
    fn delete_post(
        &self,
        post: &PostId,
        owner: &UserId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Blog API client.
#[derive(Clone)]
pub struct BlogApiClient {
    /// HTTP client.
    client: Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// Session token sent as a cookie.
    access_token: Option<SecretString>,
}

impl std::fmt::Debug for BlogApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl BlogApiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot carry a path or the HTTP client
    /// cannot be built.
    pub fn new(config: &BlogApiConfig) -> Result<Self, ApiError> {
        let mut base_url = config.base_url.clone();
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::from)?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// Attach the session cookie, if configured.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.header(
                header::COOKIE,
                format!("{ACCESS_TOKEN_COOKIE}={}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Posts listing URL for an owner and optional offset.
    fn posts_url(&self, owner: &UserId, start_index: Option<usize>) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["api", "post", "getposts"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("userId", owner.as_str());
            if let Some(start) = start_index {
                query.append_pair("startIndex", &start.to_string());
            }
        }
        Ok(url)
    }
}

impl PostsApi for BlogApiClient {
    #[instrument(skip_all, fields(owner = %owner, start_index = ?start_index))]
    async fn get_posts(
        &self,
        owner: &UserId,
        start_index: Option<usize>,
    ) -> Result<PostsPage, ApiError> {
        let url = self.posts_url(owner, start_index)?;

        let response = self.authorize(self.client.get(url)).send().await?;
        let response = reject_unless_success(response).await?;

        let page: PostsPage = response.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        debug!(count = page.posts.len(), "Fetched posts page");
        Ok(page)
    }

    #[instrument(skip_all, fields(post = %post, owner = %owner))]
    async fn delete_post(&self, post: &PostId, owner: &UserId) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "post", "deletepost", post.as_str(), owner.as_str()])?;

        let response = self.authorize(self.client.delete(url)).send().await?;
        reject_unless_success(response).await?;

        debug!("Post deleted");
        Ok(())
    }
}

/// Turn a non-success response into [`ApiError::Rejected`].
///
/// The message comes from the `{ "message": ... }` body when present,
/// otherwise from the status line.
async fn reject_unless_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<DeletePostResponse>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}
