//! The response sink handlers write into.
//!
//! Status and headers can be changed until the response is *committed*, which
//! happens on the first body write, a redirect or an explicit [`end`]. After
//! that, status and header changes are ignored, and once the response is
//! finished no more body bytes are accepted.
//!
//! [`end`]: Response::end
use crate::error::{Error, Result};

use std::io;

use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use hyper::{Body, StatusCode};
use serde::Serialize;
use tracing::warn;

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A buffered HTTP response.
///
/// ```rust
/// use ligero::Response;
/// use hyper::StatusCode;
///
/// let mut res = Response::new();
/// res.status(StatusCode::CREATED)
///     .header("X-Request-Id", "42")
///     .send("created");
///
/// // the response is committed, this is ignored
/// res.status(StatusCode::BAD_REQUEST);
///
/// assert_eq!(res.status_code(), StatusCode::CREATED);
/// assert_eq!(res.body(), b"created");
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    content_type: String,
    body: Vec<u8>,
    committed: bool,
    finished: bool,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            body: Vec::new(),
            committed: false,
            finished: false,
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Response::default()
    }

    /// A finished response reporting `err` to the client.
    pub fn from_error(err: &Error) -> Self {
        let mut res = Response::new();
        res.status(err.status_code()).send(err.public_message());
        res
    }

    /// Sets the status code.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        if self.reject_change("status") {
            return self;
        }
        self.status = status;
        self
    }

    /// Sets a header, replacing any previous value.
    ///
    /// Invalid header names or values are logged and skipped.
    pub fn header<K, V>(&mut self, name: K, value: V) -> &mut Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        if self.reject_change("header") {
            return self;
        }

        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => warn!("ignoring invalid response header"),
        }
        self
    }

    /// Sets the content type used when the body is sent.
    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        if self.reject_change("content type") {
            return self;
        }
        self.content_type = content_type.into();
        self
    }

    /// Sends `body` and finishes the response.
    pub fn send(&mut self, body: impl AsRef<[u8]>) -> &mut Self {
        if self.finished {
            warn!("response already finished, dropping body");
            return self;
        }

        self.commit_body();
        self.body.extend_from_slice(body.as_ref());
        self.finished = true;
        self
    }

    /// Serializes `value` as JSON, sends it and finishes the response.
    ///
    /// Nothing is written if serialization fails.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self.content_type("application/json").send(body))
    }

    /// Commits the status and headers and returns a writer for the body.
    ///
    /// The response stays open until [`end`](Response::end) is called or the
    /// handler returns.
    pub fn output_stream(&mut self) -> BodyWriter<'_> {
        if !self.finished {
            self.commit_body();
        }
        BodyWriter { res: self }
    }

    /// Redirects the client to `location` with `302 Found`.
    pub fn redirect(&mut self, location: &str) -> &mut Self {
        if self.reject_change("redirect") {
            return self;
        }

        self.status = StatusCode::FOUND;
        self.header(header::LOCATION, location);
        self.committed = true;
        self.finished = true;
        self
    }

    /// Finishes the response. Any further writes are rejected.
    pub fn end(&mut self) {
        self.committed = true;
        self.finished = true;
    }

    /// Whether the status and headers can no longer change.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the buffered response into a hyper response.
    pub fn into_hyper(self) -> hyper::Response<Body> {
        let mut res = hyper::Response::new(Body::from(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }

    fn commit_body(&mut self) {
        if self.committed {
            return;
        }

        if !self.headers.contains_key(header::CONTENT_TYPE) {
            match HeaderValue::from_str(&self.content_type) {
                Ok(value) => {
                    self.headers.insert(header::CONTENT_TYPE, value);
                }
                Err(_) => warn!(content_type = %self.content_type, "ignoring invalid content type"),
            }
        }
        self.committed = true;
    }

    fn reject_change(&self, what: &str) -> bool {
        if self.committed {
            warn!("response already committed, ignoring {} change", what);
        }
        self.committed
    }
}

/// Writer returned by [`Response::output_stream`].
#[derive(Debug)]
pub struct BodyWriter<'a> {
    res: &'a mut Response,
}

impl io::Write for BodyWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.res.finished {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "response already finished",
            ));
        }
        self.res.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
