//! Endpoint descriptors and a JSON request dispatcher.
//!
//! # Overview
//! Callers describe a request as an [`Endpoint`] (scheme, host, path,
//! method, headers, query/path parameters, JSON body). [`NetworkService`]
//! turns it into an [`HttpRequest`], sends it through a [`Transport`] and
//! decodes the JSON response into any `DeserializeOwned` type, either as an
//! `async fn` or with a completion callback.
//!
//! # Design
//! - Building (`request`) and classifying (`response`) are pure functions;
//!   the only I/O is `Transport::send`.
//! - `NetworkService` is stateless apart from its transport and is shared by
//!   reference or by cloning.
//! - Callers see exactly one of four [`NetworkError`] kinds; the details are
//!   logged through the `log` facade.
//! - `UreqTransport` (feature `ureq-transport`, on by default) is the stock
//!   transport.

pub mod endpoint;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;

pub use endpoint::{BasicEndpoint, Body, BodyValue, Endpoint, Headers, Params};
pub use error::{NetworkError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::build_request;
pub use response::{parse_empty_response, parse_response, ACCEPTED_STATUS};
pub use service::NetworkService;
pub use transport::Transport;
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
