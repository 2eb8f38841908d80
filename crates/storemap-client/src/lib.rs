//! Typed HTTP client for the store-locator API.

pub mod auth;
pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod stores;
pub mod types;

pub use client::{RetryPolicy, StoreMapClient};
pub use error::ClientError;
pub use types::{LoginOutcome, StoreQuery};
