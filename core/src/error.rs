//! Error types for the dispatcher and its transports.
//!
//! # Design
//! `NetworkError` is what callers see: four flat kinds, the status code being
//! the only payload. Human-readable detail (the ureq error, the serde_json
//! sub-reason) is logged where it is detected and then dropped, so callers
//! can match on the kind without parsing messages.
//!
//! `TransportError` is what a `Transport` reports. The dispatcher folds it
//! into `NetworkError`.

/// Errors returned by `NetworkService` calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The URL could not be assembled, or the request never got a response.
    #[error("invalid or unreachable target")]
    InvalidTarget,

    /// A response arrived but was malformed, or a success carried no body.
    #[error("unknown network error")]
    Unknown,

    /// The server answered outside 200-299.
    #[error("unexpected status code {status_code}")]
    UnexpectedStatusCode { status_code: u16 },

    /// The response body did not decode into the requested type, or the
    /// request body could not be encoded.
    #[error("failed to decode")]
    Decode,
}

/// Failures reported by a `Transport`.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response at all: DNS, connect, TLS, or I/O failure.
    #[error("request to {url} failed: {reason}")]
    Unreachable { url: String, reason: String },

    /// Something came back but it was not a well-formed HTTP response.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}

impl From<TransportError> for NetworkError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unreachable { .. } => NetworkError::InvalidTarget,
            TransportError::MalformedResponse { .. } => NetworkError::Unknown,
        }
    }
}
