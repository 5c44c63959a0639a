//! IdeaFusion Core - Shared types library.
//!
//! This crate provides the types shared by the IdeaFusion blog components:
//! - `dashboard` - The admin dashboard client (header, tabs, posts table)
//! - `integration-tests` - The fake blog API used by end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wire
//! shapes of the blog API live here so both the client and the test server
//! agree on them.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the post record, session and theme

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
