//! Dashboard services.
//!
//! - `post_list` - Paginated post window kept in step with the blog API

pub mod post_list;

pub use post_list::{PostListController, PostListSnapshot};
