//! The inbound request and the per-match wrapper handed to handlers.
use crate::error::Result;
use crate::params::Params;

use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Uri, Version};
use serde::de::DeserializeOwned;

/// An inbound request with its body fully read.
///
/// The router never modifies a `Request`; path parameters are exposed
/// through [`RouteRequest`] instead.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    query: Params,
    body: Bytes,
}

impl Request {
    /// Builds a request from the parts delivered by the transport.
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        let query: Params = parts
            .uri
            .query()
            .map(|query| url::form_urlencoded::parse(query.as_bytes()).collect())
            .unwrap_or_default();

        Request {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            query,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URI, including the query string.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The path component of the URI, as sent by the client.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Decoded query parameters. When a key repeats, the last value wins.
    pub fn query(&self) -> &Params {
        &self.query
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name)
    }

    /// The raw request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The request body as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// Deserializes a JSON request body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl From<hyper::Request<Bytes>> for Request {
    fn from(req: hyper::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Request::from_parts(parts, body)
    }
}

/// A [`Request`] together with the path parameters bound by the route that
/// matched it.
///
/// A new `RouteRequest` is built for every dispatch, so parameters never
/// leak between requests. Fallback handlers receive one with no parameters.
///
/// ```rust
/// use ligero::{Params, Request, RouteRequest};
/// use hyper::body::Bytes;
///
/// let req: Request = hyper::Request::get("/users/7?verbose=1")
///     .body(Bytes::new())
///     .unwrap()
///     .into();
///
/// let mut params = Params::default();
/// params.insert("id", "7");
///
/// let route = RouteRequest::new(&req, params);
/// assert_eq!(route.param("id"), Some("7"));
/// assert_eq!(route.query_param("verbose"), Some("1"));
/// ```
#[derive(Debug)]
pub struct RouteRequest<'r> {
    request: &'r Request,
    params: Params,
}

impl<'r> RouteRequest<'r> {
    pub fn new(request: &'r Request, params: Params) -> Self {
        RouteRequest { request, params }
    }

    /// The wrapped request.
    pub fn request(&self) -> &'r Request {
        self.request
    }

    /// Path parameters bound by the matched route.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn path(&self) -> &str {
        self.request.path()
    }

    pub fn version(&self) -> Version {
        self.request.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    pub fn query(&self) -> &Params {
        self.request.query()
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.request.query_param(name)
    }

    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    pub fn text(&self) -> Result<&str> {
        self.request.text()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        self.request.json()
    }
}
