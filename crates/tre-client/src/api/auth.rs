//! Credential acquisition seam.
//!
//! # Purpose
//! The portal attaches a bearer token scoped to a workspace's application id
//! URI to every API call. How that token is obtained (interactive login,
//! managed identity, client credentials) is an external concern, so the
//! client only depends on this trait.
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token acquisition failed: {0}")]
    Acquisition(String),
    #[error("no credential available for audience {0}")]
    Unavailable(String),
}

/// Supplies a bearer token for a given audience URI.
///
/// Implementations must be cheap to call repeatedly; the client requests a
/// token per HTTP call and performs no caching of its own.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self, audience: &str) -> Result<String, CredentialError>;
}

/// Fixed-token credential for service principals and tests.
#[derive(Debug, Clone)]
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        StaticCredential {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn bearer_token(&self, _audience: &str) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_credential_ignores_audience() {
        let credential = StaticCredential::new("tok-123");
        let a = credential.bearer_token("api://ws-1").await.expect("token");
        let b = credential.bearer_token("api://ws-2").await.expect("token");
        assert_eq!(a, "tok-123");
        assert_eq!(a, b);
    }
}
