//! Request descriptor handed to the eligibility predicate.

use std::fmt;
use uuid::Uuid;

/// Describes the outbound request a failure originated from.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request method (e.g. "GET").
    pub method: String,

    /// Request target.
    pub url: String,

    /// Correlation ID for matching gate logs to the caller's own logs.
    pub correlation_id: Uuid,
}

impl RequestContext {
    /// Create a descriptor with a fresh correlation ID.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            correlation_id: Uuid::new_v4(),
        }
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
