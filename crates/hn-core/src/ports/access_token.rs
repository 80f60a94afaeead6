//! Access token provider port
//!
//! Implemented by the application layer's credential store and consumed
//! by the API client, so the HTTP adapter can attach the bearer header
//! without owning token storage.

use async_trait::async_trait;

#[async_trait]
pub trait AccessTokenProviderPort: Send + Sync {
    /// The current bearer token, or `None` when nobody is logged in.
    /// Expiry is not checked here; the backend is the final judge.
    async fn access_token(&self) -> Option<String>;
}
