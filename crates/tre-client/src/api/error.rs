//! API error taxonomy.
//!
//! # Purpose
//! One error type for everything that can go wrong between "the view asked
//! for data" and "a validated payload came back". Variants keep the method
//! and path so a logged error identifies the failing call without extra
//! context.
use thiserror::Error;

use crate::api::auth::CredentialError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http client construction failed: {0}")]
    Build(#[source] reqwest::Error),
    #[error("credential for {audience}: {source}")]
    Credential {
        audience: String,
        #[source]
        source: CredentialError,
    },
    #[error("{method} {path}: {source}")]
    Transport {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {path}: http {status}: {code}: {message}")]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        code: String,
        message: String,
    },
    #[error("{method} {path}: invalid response body: {source}")]
    Decode {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status of a rejected request, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
