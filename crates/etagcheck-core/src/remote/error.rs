//! Errors from fetching remote part metadata.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store answered 404 for the bucket or key.
    #[error("object not found")]
    NotFound,
    /// Any other non-2xx answer (403 for bad credentials, 5xx, ...).
    #[error("HEAD returned HTTP {status}")]
    Http { status: u32 },
    /// libcurl could not complete the request (DNS, connect, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(#[from] curl::Error),
    /// A configured credential provider failed (expired SSO session,
    /// broken profile, unreachable STS).
    #[error("credentials: {0}")]
    Credentials(String),
    /// The bucket lives in another region and the endpoint cannot follow it.
    #[error("bucket is in region {region}; pass --region {region}")]
    WrongRegion { region: String },
    /// Endpoint or key could not be turned into a request URL.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A required header was missing or unparsable.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound)
    }
}

/// Map a non-2xx status to the error the verifier should see.
pub(crate) fn from_status(status: u32) -> RemoteError {
    match status {
        404 => RemoteError::NotFound,
        _ => RemoteError::Http { status },
    }
}
