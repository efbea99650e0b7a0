//! Explicit caller identity.
//!
//! The acting identity is always passed to services as an argument instead of
//! being read from ambient security state. At the HTTP edge an extractor
//! pulls the value out of the request extensions, where the application's
//! authentication middleware must have placed it.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use serde::{Deserialize, Serialize};

/// The authenticated caller's identity: its login name (the user email).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    username: String,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// The login identifier used to resolve the backing user record.
    pub fn name(&self) -> &str {
        &self.username
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string()).into_response()
            })
    }
}
