//! The seam between the dispatcher and an actual HTTP stack.
//!
//! # Design
//! `NetworkService` never talks to sockets itself. It hands a finished
//! `HttpRequest` to a `Transport` and classifies whatever comes back, so the
//! platform client can be swapped (or stubbed in tests) without touching the
//! build or decode logic.
//!
//! A transport must return non-2xx responses as data. Status interpretation
//! belongs to the dispatcher.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

#[cfg(feature = "ureq-transport")]
mod ureq_impl;

#[cfg(feature = "ureq-transport")]
pub use ureq_impl::UreqTransport;

/// Executes one `HttpRequest`.
///
/// Implementations are cheap to clone and safe to share between tasks; one
/// transport serves every call made through a `NetworkService`.
///
/// ```ignore
/// use async_trait::async_trait;
/// use networking_core::{HttpRequest, HttpResponse, Transport, TransportError};
///
/// #[derive(Clone)]
/// struct MyTransport;
///
/// #[async_trait]
/// impl Transport for MyTransport {
///     async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
///         // Execute `request` with your HTTP library.
///         Ok(HttpResponse::new(200, "{}"))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync + Clone {
    /// Send `request` and return the response, whatever its status.
    ///
    /// Return `TransportError::Unreachable` when no response was received
    /// and `TransportError::MalformedResponse` when the reply was not valid
    /// HTTP.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
