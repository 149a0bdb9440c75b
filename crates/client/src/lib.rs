//! HTTP clients for the two external backend services: the identity
//! gateway ([`IdentityClient`]) and the record store ([`StoreClient`]).
//!
//! Both implement the collaborator traits from `engine`, so the
//! components never see HTTP; tests can swap in fakes.

pub use identity::IdentityClient;
pub use store::StoreClient;

mod identity;
mod store;

use serde::Deserialize;
use thiserror::Error;

/// Header carrying the backend project's API key on every request.
pub(crate) const API_KEY_HEADER: &str = "x-api-key";

/// Error building a client from configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base_url: {0}")]
    InvalidBaseUrl(String),
}

/// Error body shape shared by both services.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}
