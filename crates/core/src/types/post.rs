//! Blog post records as returned by the blog API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{PostId, UserId};

/// Number of posts the blog API returns per page.
///
/// The limit is enforced server-side; the client only uses it to decide
/// whether another page may exist.
pub const POSTS_PAGE_SIZE: usize = 9;

/// A single post owned by a user.
///
/// Created, updated and deleted exclusively by the blog API. The client
/// never validates these fields beyond display formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub slug: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    "uncategorized".to_string()
}

impl Post {
    /// Public path of the rendered post.
    #[must_use]
    pub fn permalink(&self) -> String {
        format!("/post/{}", self.slug)
    }

    /// Path of the post editor.
    #[must_use]
    pub fn edit_path(&self) -> String {
        format!("/update-post/{}", self.id)
    }
}

/// Response body of `GET /api/post/getposts`.
///
/// Only `posts` is required; the totals are returned by the backend but
/// unused by the posts table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPage {
    pub posts: Vec<Post>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_month_posts: Option<u64>,
}

impl PostsPage {
    /// Whether the page was full, meaning another page may follow.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.posts.len() == POSTS_PAGE_SIZE
    }
}

/// Response body of `DELETE /api/post/deletepost/{post}/{user}`.
///
/// On failure the backend sends `{ "message": "..." }`; on success the body
/// is a bare JSON string or empty, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePostResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
