//! The dispatcher: build, send, classify.
//!
//! # Design
//! `NetworkService` holds nothing but its transport, so one instance can be
//! shared by any number of concurrent callers. The build/send/classify
//! pipeline lives in the async methods; the callback methods spawn a task
//! that awaits them and hands the result to a `FnOnce`, which therefore runs
//! exactly once per call.

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::HttpResponse;
use crate::request::build_request;
use crate::response::{parse_empty_response, parse_response};
use crate::transport::Transport;

/// Sends `Endpoint`s through a `Transport` and decodes JSON responses.
#[derive(Debug, Clone)]
pub struct NetworkService<T> {
    transport: T,
}

impl<T: Transport> NetworkService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `endpoint` and decode the response body into `R`.
    pub async fn send<R, E>(&self, endpoint: &E) -> Result<R, NetworkError>
    where
        R: DeserializeOwned,
        E: Endpoint + Sync + ?Sized,
    {
        let response = self.execute(endpoint).await?;
        parse_response(response)
    }

    /// Send `endpoint` when no payload is expected back. Any accepted status
    /// succeeds and the body is not read.
    pub async fn send_without_response<E>(&self, endpoint: &E) -> Result<(), NetworkError>
    where
        E: Endpoint + Sync + ?Sized,
    {
        let response = self.execute(endpoint).await?;
        parse_empty_response(response)
    }

    async fn execute<E>(&self, endpoint: &E) -> Result<HttpResponse, NetworkError>
    where
        E: Endpoint + Sync + ?Sized,
    {
        let request = build_request(endpoint)?;
        log::debug!("{} {}", request.method, request.url);

        self.transport.send(&request).await.map_err(|err| {
            log::debug!("{err}");
            NetworkError::from(err)
        })
    }
}

impl<T: Transport + 'static> NetworkService<T> {
    /// Callback form of [`send`](Self::send).
    ///
    /// Spawns the call on the current Tokio runtime and invokes `completion`
    /// once it resolves. Must be called from within a Tokio runtime.
    pub fn send_request<R, E, F>(&self, endpoint: E, completion: F) -> JoinHandle<()>
    where
        R: DeserializeOwned + Send + 'static,
        E: Endpoint + Send + Sync + 'static,
        F: FnOnce(Result<R, NetworkError>) + Send + 'static,
    {
        let service = self.clone();
        tokio::spawn(async move {
            let result = service.send(&endpoint).await;
            completion(result);
        })
    }

    /// Callback form of [`send_without_response`](Self::send_without_response).
    pub fn send_request_without_response<E, F>(&self, endpoint: E, completion: F) -> JoinHandle<()>
    where
        E: Endpoint + Send + Sync + 'static,
        F: FnOnce(Result<(), NetworkError>) + Send + 'static,
    {
        let service = self.clone();
        tokio::spawn(async move {
            let result = service.send_without_response(&endpoint).await;
            completion(result);
        })
    }
}

#[cfg(feature = "ureq-transport")]
impl NetworkService<crate::transport::UreqTransport> {
    /// Process-wide service over a default `UreqTransport`.
    pub fn shared() -> &'static Self {
        static SHARED: std::sync::OnceLock<NetworkService<crate::transport::UreqTransport>> =
            std::sync::OnceLock::new();
        SHARED.get_or_init(Self::default)
    }
}

#[cfg(feature = "ureq-transport")]
impl Default for NetworkService<crate::transport::UreqTransport> {
    fn default() -> Self {
        Self::new(crate::transport::UreqTransport::new())
    }
}
