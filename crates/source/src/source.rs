use std::collections::BTreeMap;

use async_trait::async_trait;
use netbuilder_core::{BuilderError, Record};

/// Pass-through request headers.
pub type SourceHeaders = BTreeMap<String, String>;

/// Errors raised while executing a query against a record source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status.
    #[error("Endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a result set.
    #[error("Could not decode results: {0}")]
    Decode(String),

    /// A pass-through header could not be encoded.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),
}

impl From<SourceError> for BuilderError {
    fn from(e: SourceError) -> Self {
        BuilderError::Source(e.to_string())
    }
}

/// Executes query text against an endpoint and returns flat records in
/// response order.
///
/// Failures are returned as-is; implementations do not retry.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn query(
        &self,
        text: &str,
        endpoint: &str,
        headers: &SourceHeaders,
    ) -> Result<Vec<Record>, SourceError>;
}
