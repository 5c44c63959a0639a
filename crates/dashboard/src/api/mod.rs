//! Blog REST API client.
//!
//! The backend is an external collaborator: the endpoint shapes are taken as
//! given and the client never second-guesses the data it returns.

pub mod client;
pub mod error;

pub use client::{BlogApiClient, PostsApi};
pub use error::ApiError;
