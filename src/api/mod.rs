//! HTTP access to the authoritative workflow store.
//!
//! - [`client::ApiClient`]: typed reqwest wrapper carrying the session token
//! - [`error::ApiError`]: the classified failure taxonomy
//! - [`payloads`]: wire request/response shapes

pub mod client;
pub mod error;
pub mod payloads;

pub use client::ApiClient;
pub use error::ApiError;
