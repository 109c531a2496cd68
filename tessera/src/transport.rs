//! Transport collaborator contract
//!
//! The network layer lives outside this crate; widgets only hand it a
//! fully-built request and read back the JSON body.

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A search request ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub url: String,
    /// Canonical JSON body
    pub body: String,
}

impl SearchRequest {
    pub const METHOD: &'static str = "POST";
    pub const CONTENT_TYPE: &'static str = "application/json";

    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// Executes search requests.
///
/// Implementations own timeouts; failures are reported as
/// [`crate::Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Value>;
}
