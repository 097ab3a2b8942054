//! Blocking `Transport` backed by a ureq agent.

use std::fmt;
use std::time::Duration;

use ureq::{Agent, RequestBuilder};

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes requests with ureq. 4xx/5xx responses come back as data so the
/// client can turn them into `ApiErr`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Fail any request that takes longer than `timeout` end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref();

        let result = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let mut response = result.map_err(into_transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(into_transport_error)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn into_transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::BadUri(message) => TransportError::InvalidRequest(message),
        ureq::Error::Http(err) => TransportError::InvalidRequest(err.to_string()),
        other => TransportError::Connection(other.to_string()),
    }
}
