//! Response body codecs.
//!
//! The admin API answers most endpoints in JSON but the create endpoint in
//! XML. Each operation names its codec as a type parameter, so the choice is
//! fixed at compile time rather than made per call.

use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// A wire format a response body can be decoded from.
pub trait Codec {
    /// Short name used in decode errors and logs.
    const NAME: &'static str;

    /// Value sent in the `Accept` header.
    const ACCEPT: &'static str;

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

#[derive(Debug, Clone, Copy, Default)]
pub struct Xml;

impl Codec for Json {
    const NAME: &'static str = "json";
    const ACCEPT: &'static str = "application/json";

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
        serde_json::from_str(body).map_err(|e| ClientError::Decode {
            format: Self::NAME,
            message: e.to_string(),
        })
    }
}

impl Codec for Xml {
    const NAME: &'static str = "xml";
    const ACCEPT: &'static str = "application/xml";

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
        quick_xml::de::from_str(body).map_err(|e| ClientError::Decode {
            format: Self::NAME,
            message: e.to_string(),
        })
    }
}
