//! Endpoint descriptors: what a caller wants sent, as plain read-only data.
//!
//! # Design
//! `Endpoint` is a trait rather than a struct so API crates can describe
//! their routes as enums or unit structs and compute each field on demand.
//! Only `path` and `method` are required; everything else has a default.
//! `BasicEndpoint` covers the cases where declaring a type is overkill.
//!
//! Maps are `BTreeMap` so headers, query pairs and body keys always come out
//! in the same order, which keeps `build_request` deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::http::HttpMethod;

pub type Headers = BTreeMap<String, String>;
pub type Params = BTreeMap<String, String>;
pub type Body = BTreeMap<String, BodyValue>;

/// Describes one intended HTTP call.
///
/// ```
/// use networking_core::{Endpoint, HttpMethod};
///
/// struct GetUser(u64);
///
/// impl Endpoint for GetUser {
///     fn host(&self) -> String {
///         "api.example.com".to_string()
///     }
///
///     fn path(&self) -> String {
///         format!("/users/{}", self.0)
///     }
///
///     fn method(&self) -> HttpMethod {
///         HttpMethod::Get
///     }
/// }
/// ```
pub trait Endpoint {
    fn host(&self) -> String {
        String::new()
    }

    fn scheme(&self) -> String {
        "https".to_string()
    }

    /// Path, optionally containing `{name}` placeholders filled from
    /// `path_params`.
    fn path(&self) -> String;

    fn method(&self) -> HttpMethod;

    fn headers(&self) -> Option<Headers> {
        None
    }

    /// JSON object sent as the request payload.
    fn body(&self) -> Option<Body> {
        None
    }

    fn query_params(&self) -> Option<Params> {
        None
    }

    fn path_params(&self) -> Option<Params> {
        None
    }
}

impl<E: Endpoint + ?Sized> Endpoint for &E {
    fn host(&self) -> String {
        (**self).host()
    }

    fn scheme(&self) -> String {
        (**self).scheme()
    }

    fn path(&self) -> String {
        (**self).path()
    }

    fn method(&self) -> HttpMethod {
        (**self).method()
    }

    fn headers(&self) -> Option<Headers> {
        (**self).headers()
    }

    fn body(&self) -> Option<Body> {
        (**self).body()
    }

    fn query_params(&self) -> Option<Params> {
        (**self).query_params()
    }

    fn path_params(&self) -> Option<Params> {
        (**self).path_params()
    }
}

impl<E: Endpoint + ?Sized> Endpoint for Box<E> {
    fn host(&self) -> String {
        (**self).host()
    }

    fn scheme(&self) -> String {
        (**self).scheme()
    }

    fn path(&self) -> String {
        (**self).path()
    }

    fn method(&self) -> HttpMethod {
        (**self).method()
    }

    fn headers(&self) -> Option<Headers> {
        (**self).headers()
    }

    fn body(&self) -> Option<Body> {
        (**self).body()
    }

    fn query_params(&self) -> Option<Params> {
        (**self).query_params()
    }

    fn path_params(&self) -> Option<Params> {
        (**self).path_params()
    }
}

type EncodeFn = dyn Fn() -> serde_json::Result<serde_json::Value> + Send + Sync;

/// A type-erased body field value.
///
/// Wraps any `Serialize` value so a single body map can mix strings, numbers
/// and nested structs. Encoding is deferred to `build_request`, which is
/// where a failing `Serialize` impl gets reported.
#[derive(Clone)]
pub struct BodyValue(Arc<EncodeFn>);

impl BodyValue {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self(Arc::new(move || serde_json::to_value(&value)))
    }
}

impl Serialize for BodyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.0)()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl fmt::Debug for BodyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0)() {
            Ok(value) => write!(f, "BodyValue({value})"),
            Err(err) => write!(f, "BodyValue(<unencodable: {err}>)"),
        }
    }
}

/// A ready-made `Endpoint` with builder-style setters.
#[derive(Debug, Clone)]
pub struct BasicEndpoint {
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub method: HttpMethod,
    pub headers: Option<Headers>,
    pub body: Option<Body>,
    pub query_params: Option<Params>,
    pub path_params: Option<Params>,
}

impl BasicEndpoint {
    pub fn new(method: HttpMethod, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            path: path.into(),
            method,
            headers: None,
            body: None,
            query_params: None,
            path_params: None,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body_field<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        self.body
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), BodyValue::new(value));
        self
    }
}

impl Endpoint for BasicEndpoint {
    fn host(&self) -> String {
        self.host.clone()
    }

    fn scheme(&self) -> String {
        self.scheme.clone()
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn method(&self) -> HttpMethod {
        self.method
    }

    fn headers(&self) -> Option<Headers> {
        self.headers.clone()
    }

    fn body(&self) -> Option<Body> {
        self.body.clone()
    }

    fn query_params(&self) -> Option<Params> {
        self.query_params.clone()
    }

    fn path_params(&self) -> Option<Params> {
        self.path_params.clone()
    }
}
