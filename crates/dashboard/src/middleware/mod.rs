//! HTTP middleware and extractors for the dashboard.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//!
//! Session access is not a layer: the session is part of [`crate::state::AppState`]
//! and handed out by the extractors in [`auth`].

pub mod auth;

pub use auth::{CurrentSession, PostAdminRejection, RequirePostAdmin};
