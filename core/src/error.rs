//! Error types for the application client.
//!
//! # Design
//! Callers match on `ClientError` to tell the three failure classes apart:
//! the round-trip never completed (`Transport`), the API answered with a
//! non-2xx status (`Api`), or a 2xx body did not fit the expected schema
//! (`Decode`). Every non-2xx response, 404 included, becomes an `ApiErr` with
//! the raw status and body.

use serde::Deserialize;
use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `ThreeScale` operations and `ApplicationClient` methods.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiErr),

    /// The response body could not be decoded into the expected type.
    #[error("failed to decode {format} response: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    /// The admin portal endpoint failed validation.
    #[error("invalid admin portal: {0}")]
    InvalidPortal(String),
}

impl ClientError {
    /// The API error, when this failure came from a non-2xx response.
    pub fn as_api_err(&self) -> Option<&ApiErr> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// A non-2xx answer from the 3scale admin API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error calling 3scale system - reason: {body} - code: {code}")]
pub struct ApiErr {
    code: u16,
    body: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: String,
}

impl ApiErr {
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        Self {
            code,
            body: body.into(),
        }
    }

    /// HTTP status code of the response.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Raw response body, exactly as received.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Message from a `{ "error": "..." }` body, if the body has that shape.
    pub fn reason(&self) -> Option<String> {
        serde_json::from_str::<ErrorEnvelope>(&self.body)
            .ok()
            .map(|envelope| envelope.error)
    }
}
