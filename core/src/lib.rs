//! Synchronous client for the 3scale account/application admin API.
//!
//! # Overview
//! Creates, reads, updates, deletes, suspends and resumes applications, and
//! changes or customizes their plans. Every operation is one HTTP round-trip:
//! build the request, run it through a `Transport`, decode the body.
//!
//! # Design
//! - `ApplicationClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`, no I/O in between.
//! - `ThreeScale<T: Transport>` pairs it with a transport and exposes one
//!   method per API action. Any `Fn(&HttpRequest) -> Result<HttpResponse, _>`
//!   is a transport; `UreqTransport` is the real one.
//! - Each endpoint's wire format is a `Codec` type (`Json` or `Xml`).
//! - Failures are a `ClientError` enum: transport, API (`ApiErr`) or decode.
//!
//! ```rust,no_run
//! use threescale_client::{AdminPortal, Params, ThreeScale, UreqTransport};
//!
//! # fn main() -> Result<(), threescale_client::ClientError> {
//! let portal = AdminPortal::parse("https://acme-admin.3scale.net")?;
//! let client = ThreeScale::new(portal, "access-token", UreqTransport::new());
//!
//! let app = client.create_application(321, 123, "my-app", "")?;
//! client.update_application(321, app.id, &Params::from([("description", "updated")]))?;
//! client.suspend_application(321, app.id)?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod portal;
pub mod threescale;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::ApplicationClient;
pub use codec::{Codec, Json, Xml};
pub use error::{ApiErr, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use portal::{AdminPortal, Credential};
pub use threescale::ThreeScale;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Application, ApplicationElem, ApplicationList, ApplicationPlan, ApplicationPlanElem, Params};
