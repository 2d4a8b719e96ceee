//! Endpoint-to-request translation.
//!
//! # Design
//! `build_request` is pure: it reads an `Endpoint` and either returns a
//! complete `HttpRequest` or fails before any transport is involved. The URL
//! is assembled with the `url` crate; reserved characters in query pairs and
//! substituted path parameters are percent-encoded here, never by callers.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

use crate::endpoint::{Endpoint, Params};
use crate::error::NetworkError;
use crate::http::HttpRequest;

/// Characters escaped when a path parameter is substituted into the path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Build the transport request described by `endpoint`.
///
/// Fails with `InvalidTarget` if the URL cannot be assembled or a path
/// placeholder has no value, and with `Decode` if the body cannot be encoded
/// as JSON.
pub fn build_request<E: Endpoint + ?Sized>(endpoint: &E) -> Result<HttpRequest, NetworkError> {
    let path = substitute_path_params(&endpoint.path(), endpoint.path_params().as_ref())?;
    let url = assemble_url(
        &endpoint.scheme(),
        &endpoint.host(),
        &path,
        endpoint.query_params().as_ref(),
    )?;

    let mut headers: Vec<(String, String)> = endpoint
        .headers()
        .unwrap_or_default()
        .into_iter()
        .collect();

    let body = match endpoint.body() {
        Some(body) => {
            let bytes = serde_json::to_vec(&body).map_err(|err| {
                log::debug!("failed to encode request body for {url}: {err}");
                NetworkError::Decode
            })?;
            if !headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            {
                headers.push(("content-type".to_string(), "application/json".to_string()));
            }
            log::debug!("request body for {url}: {}", String::from_utf8_lossy(&bytes));
            Some(bytes)
        }
        None => None,
    };

    Ok(HttpRequest {
        method: endpoint.method(),
        url,
        headers,
        body,
    })
}

/// Replace each `{name}` in `template` with the matching path parameter.
fn substitute_path_params(template: &str, params: Option<&Params>) -> Result<String, NetworkError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            log::debug!("unterminated placeholder in path {template:?}");
            NetworkError::InvalidTarget
        })?;
        let name = &after[..close];
        let value = params.and_then(|p| p.get(name)).ok_or_else(|| {
            log::debug!("no value for path placeholder {{{name}}} in {template:?}");
            NetworkError::InvalidTarget
        })?;
        path.extend(utf8_percent_encode(value, PATH_SEGMENT));
        rest = &after[close + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

fn assemble_url(
    scheme: &str,
    host: &str,
    path: &str,
    query: Option<&Params>,
) -> Result<Url, NetworkError> {
    if host.contains(['/', '?', '#', '@']) {
        log::debug!("host {host:?} is not a bare authority");
        return Err(NetworkError::InvalidTarget);
    }

    let mut url = Url::parse(&format!("{scheme}://{host}")).map_err(|err| {
        log::debug!("cannot build URL from scheme {scheme:?} and host {host:?}: {err}");
        NetworkError::InvalidTarget
    })?;
    url.set_path(path);

    if let Some(query) = query.filter(|query| !query.is_empty()) {
        url.query_pairs_mut().extend_pairs(query.iter());
    }

    Ok(url)
}
