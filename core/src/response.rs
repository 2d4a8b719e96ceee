//! Response classification and typed decoding.
//!
//! # Design
//! Pure functions over `HttpResponse`, mirroring `build_request` on the way
//! back: the status is checked against `ACCEPTED_STATUS` first, so a bad
//! status wins over any body content, and every decoding problem collapses
//! into `NetworkError::Decode`. The serde_json sub-reason is logged only.

use std::ops::RangeInclusive;

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::NetworkError;
use crate::http::HttpResponse;

/// Status codes treated as success.
pub const ACCEPTED_STATUS: RangeInclusive<u16> = 200..=299;

/// Classify `response` and decode its body into `T`.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, NetworkError> {
    check_status(&response)?;

    if response.body.is_empty() {
        log::debug!("status {} with empty body", response.status);
        return Err(NetworkError::Unknown);
    }

    serde_json::from_slice(&response.body).map_err(|err| {
        match err.classify() {
            Category::Syntax => log::debug!("malformed JSON: {err}"),
            Category::Eof => log::debug!("truncated JSON: {err}"),
            Category::Data => log::debug!("JSON does not match target type: {err}"),
            Category::Io => log::debug!("I/O error while decoding: {err}"),
        }
        NetworkError::Decode
    })
}

/// Classify `response` for calls that expect no payload. The body is never
/// inspected.
pub fn parse_empty_response(response: HttpResponse) -> Result<(), NetworkError> {
    check_status(&response)
}

fn check_status(response: &HttpResponse) -> Result<(), NetworkError> {
    if ACCEPTED_STATUS.contains(&response.status) {
        return Ok(());
    }
    log::warn!("received unexpected status code: {}", response.status);
    Err(NetworkError::UnexpectedStatusCode {
        status_code: response.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct User {
        id: u64,
        name: String,
    }

    #[test]
    fn ok_with_matching_body_decodes() {
        let user: User = parse_response(HttpResponse::new(200, r#"{"id":1,"name":"a"}"#)).unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn edges_of_accepted_range_succeed() {
        for status in [200, 201, 204, 299] {
            assert!(parse_empty_response(HttpResponse::new(status, "")).is_ok(), "{status}");
        }
    }

    #[test]
    fn outside_accepted_range_carries_status() {
        for status in [100, 199, 300, 404, 500] {
            let err = parse_response::<User>(HttpResponse::new(status, r#"{"id":1,"name":"a"}"#))
                .unwrap_err();
            assert_eq!(err, NetworkError::UnexpectedStatusCode { status_code: status });
        }
    }

    #[test]
    fn empty_body_is_unknown() {
        let err = parse_response::<User>(HttpResponse::new(200, "")).unwrap_err();
        assert_eq!(err, NetworkError::Unknown);
    }

    #[test]
    fn every_decoding_problem_is_decode() {
        let bodies = [
            "not json",
            r#"{"id":1"#,
            r#"{"id":1}"#,
            r#"{"id":"one","name":"a"}"#,
            r#"{"id":null,"name":"a"}"#,
        ];
        for body in bodies {
            let err = parse_response::<User>(HttpResponse::new(200, body)).unwrap_err();
            assert_eq!(err, NetworkError::Decode, "{body}");
        }
    }

    #[test]
    fn empty_response_ignores_body() {
        assert!(parse_empty_response(HttpResponse::new(201, "not json")).is_ok());
        assert_eq!(
            parse_empty_response(HttpResponse::new(404, "")).unwrap_err(),
            NetworkError::UnexpectedStatusCode { status_code: 404 }
        );
    }
}
