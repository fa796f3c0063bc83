//! Error types shared by the router, the response helpers and the server.

use hyper::{Method, StatusCode};
use thiserror::Error;

/// Boxed error returned by handlers.
///
/// Anything implementing [`std::error::Error`] can be propagated out of a
/// handler with `?`, including [`Error`] itself.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    // Routing
    #[error("Route not found: {path}")]
    NoRouteMatched { method: Method, path: String },

    #[error("Invalid route pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("Invalid HTTP method: {method}")]
    InvalidMethod { method: String },

    #[error("Handler failed: {0}")]
    Handler(BoxError),

    // Request and response bodies
    #[error("JSON error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Request body is not valid UTF-8")]
    InvalidBody(#[from] std::str::Utf8Error),

    #[error("Failed to read request body: {0}")]
    Body(#[source] hyper::Error),

    // Server and configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] hyper::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {field}, reason: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Invalid listen address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
}

impl Error {
    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        Error::MalformedPattern {
            pattern: pattern.to_owned(),
            reason: reason.into(),
        }
    }

    /// The HTTP status code a client should see for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NoRouteMatched { .. } => StatusCode::NOT_FOUND,
            Error::InvalidBody(_) | Error::Body(_) => StatusCode::BAD_REQUEST,
            Error::MalformedPattern { .. }
            | Error::InvalidMethod { .. }
            | Error::Handler(_)
            | Error::Codec(_)
            | Error::Io(_)
            | Error::Serve(_)
            | Error::ConfigParse(_)
            | Error::InvalidConfig { .. }
            | Error::InvalidAddress(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client.
    ///
    /// Server-side failures only expose the canonical reason phrase; their
    /// cause is logged instead.
    pub fn public_message(&self) -> String {
        let status = self.status_code();
        if status.is_server_error() {
            status
                .canonical_reason()
                .unwrap_or("Internal Server Error")
                .to_owned()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let err = Error::NoRouteMatched {
            method: Method::GET,
            path: "/missing".to_owned(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Route not found: /missing");
    }

    #[test]
    fn server_errors_hide_their_cause() {
        let err = Error::Handler("database password is hunter2".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");
    }

    #[test]
    fn malformed_pattern_message() {
        let err = Error::malformed("/a/{}", "empty parameter name");
        assert_eq!(
            err.to_string(),
            "Invalid route pattern '/a/{}': empty parameter name"
        );
    }
}
