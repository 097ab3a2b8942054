//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain owned data. `ApplicationClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; whatever implements `Transport` performs the round-trip. Any
//! closure with the right signature is a transport, which is how the tests
//! stub the API.

use std::fmt;

use thiserror::Error;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the query string, including the
/// access token for requests without a body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to complete the HTTP round-trip at all.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be constructed (bad URL, bad header).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection, DNS, TLS or I/O failure.
    #[error("transport failure: {0}")]
    Connection(String),
}

/// Executes one `HttpRequest` and returns the server's response, whatever its
/// status. Non-2xx statuses are data, not transport errors.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}
