//! IdeaFusion dashboard - server-rendered admin dashboard for the blog.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - Blog REST API over reqwest, cookie-authenticated
//! - One [`services::PostListController`] per process caching the owner's
//!   post window
//!
//! The signed-in session and the initial theme are injected through
//! configuration; see [`config::DashboardConfig`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::DashboardConfig;
pub use error::AppError;
pub use routes::app;
pub use state::AppState;
