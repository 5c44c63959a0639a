//! Core types for the IdeaFusion blog.
//!
//! This module provides type-safe wrappers for the blog's domain concepts.

pub mod id;
pub mod post;
pub mod session;

pub use id::*;
pub use post::{DeletePostResponse, POSTS_PAGE_SIZE, Post, PostsPage};
pub use session::{Session, Theme, ThemeParseError};
