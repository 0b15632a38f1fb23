//! Error types for the blog API client.
//!
//! # Design
//! Every failure is terminal for the call that produced it: nothing here is
//! retried or recovered. `Status` and `Format` carry a body snippet (at most
//! 200 characters) instead of the full body so an HTML error page never ends
//! up verbatim in logs or UI. A response whose JSON shape is unexpected is not
//! an error at all; the normalizer degrades it to empty/default values.

/// Errors returned by `BlogClient` parse methods and `BlogApi` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or no response arrived.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status outside 200..=299.
    #[error("API Error: {status} {status_text}{}", body_suffix(.snippet))]
    Status {
        status: u16,
        status_text: String,
        snippet: String,
    },

    /// A successful response whose body could not be recognised as JSON.
    #[error("Expected JSON response but received: {snippet}")]
    Format { snippet: String },

    /// The body looked like JSON but did not parse, or did not fit the
    /// expected entity type after normalization.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(snippet: &str) -> String {
    if snippet.is_empty() {
        String::new()
    } else {
        format!(" | body: {snippet}")
    }
}
