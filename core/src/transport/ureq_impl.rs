use std::fmt;

use async_trait::async_trait;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::RequestBuilder;

use super::Transport;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

type UreqResponse = ureq::http::Response<ureq::Body>;

/// Blocking ureq client run on Tokio's blocking pool.
///
/// Timeouts, proxies and TLS settings are whatever the wrapped
/// `ureq::Agent` carries; the default agent uses ureq's defaults.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Use a caller-configured agent.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let request = request.clone();
        let url = request.url.to_string();

        tokio::task::spawn_blocking(move || execute(&agent, &request))
            .await
            .map_err(|err| TransportError::Unreachable {
                url,
                reason: err.to_string(),
            })?
    }
}

fn execute(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
    let url = request.url.as_str();
    let headers = &request.headers;
    let body = request.body.as_deref();

    let result = match request.method {
        HttpMethod::Get => call_without_body(agent.get(url), headers, body),
        HttpMethod::Delete => call_without_body(agent.delete(url), headers, body),
        HttpMethod::Post => call_with_body(agent.post(url), headers, body),
        HttpMethod::Put => call_with_body(agent.put(url), headers, body),
        HttpMethod::Patch => call_with_body(agent.patch(url), headers, body),
    };

    let mut response = match result {
        Ok(response) => response,
        // Only reachable with an agent that still treats statuses as errors.
        Err(ureq::Error::StatusCode(status)) => return Ok(HttpResponse::new(status, Vec::new())),
        Err(err) => return Err(classify(url, err)),
    };

    let status = response.status().as_u16();
    let response_headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    // Headers are in: body failures are malformed responses. No size cap.
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(|err| TransportError::MalformedResponse {
            url: url.to_string(),
            reason: err.to_string(),
        })?;

    Ok(HttpResponse {
        status,
        headers: response_headers,
        body,
    })
}

fn call_without_body(
    builder: RequestBuilder<WithoutBody>,
    headers: &[(String, String)],
    body: Option<&[u8]>,
) -> Result<UreqResponse, ureq::Error> {
    let builder = headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()));
    match body {
        Some(bytes) => builder.force_send_body().send(bytes),
        None => builder.call(),
    }
}

fn call_with_body(
    builder: RequestBuilder<WithBody>,
    headers: &[(String, String)],
    body: Option<&[u8]>,
) -> Result<UreqResponse, ureq::Error> {
    let builder = headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()));
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

/// Classify a failure to get a status line and headers back.
fn classify(url: &str, err: ureq::Error) -> TransportError {
    let url = url.to_string();
    match err {
        ureq::Error::Protocol(_) => {
            TransportError::MalformedResponse {
                url,
                reason: err.to_string(),
            }
        }
        other => TransportError::Unreachable {
            url,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;
    use crate::error::NetworkError;
    use crate::service::NetworkService;

    /// Serve one connection: read the request head, write `response`
    /// verbatim, then close.
    fn serve_once(response: Vec<u8>) -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            let _ = stream.write_all(&response);
        });

        port
    }

    fn get(port: u16) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url::Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn truncated_body_is_malformed() {
        let port = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\nconnection: close\r\n\r\n{\"id\":1".to_vec(),
        );

        let err = UreqTransport::new().send(&get(port)).await.unwrap_err();
        assert!(matches!(err, TransportError::MalformedResponse { .. }), "{err}");
    }

    #[tokio::test]
    async fn truncated_body_surfaces_as_unknown() {
        let port = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\nconnection: close\r\n\r\n{\"id\":1".to_vec(),
        );
        let endpoint = crate::endpoint::BasicEndpoint::new(
            HttpMethod::Get,
            format!("127.0.0.1:{port}"),
            "/",
        )
        .with_scheme("http");

        let err = NetworkService::new(UreqTransport::new())
            .send::<serde_json::Value, _>(&endpoint)
            .await
            .unwrap_err();
        assert_eq!(err, NetworkError::Unknown);
    }

    #[tokio::test]
    async fn large_body_is_read_whole() {
        // Above ureq's default 10 MiB read limit.
        let payload = "a".repeat(11 * 1024 * 1024);
        let body = format!(r#"{{"data":"{payload}"}}"#);
        let mut response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body.as_bytes());
        let port = serve_once(response);
        let endpoint = crate::endpoint::BasicEndpoint::new(
            HttpMethod::Get,
            format!("127.0.0.1:{port}"),
            "/",
        )
        .with_scheme("http");

        let value: serde_json::Value = NetworkService::new(UreqTransport::new())
            .send(&endpoint)
            .await
            .unwrap();
        assert_eq!(value["data"].as_str().unwrap().len(), payload.len());
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Bind then drop to get a port with nothing listening.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: url::Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(),
            headers: Vec::new(),
            body: None,
        };

        let err = UreqTransport::new().send(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Unreachable { .. }), "{err}");
    }
}
