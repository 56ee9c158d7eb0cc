//! Generic REST plumbing for the automation and arc services.
//!
//! The layers, from the wire up:
//!
//! - [`Transport`]: sends one request to a named service and returns the raw
//!   response, whatever its status.
//! - [`RetryPolicy`]: repeats a call on 5xx and transport failures with
//!   capped exponential backoff.
//! - [`RestClient`]: combines the two and collects paginated lists into a
//!   single ordered collection.

mod client;
mod pagination;
mod request;
mod retry;
mod service;
mod transport;


pub use client::RestClient;
pub use pagination::PaginationSettings;
pub use request::{RestRequest, RestResponse, prettify_body};
pub use retry::RetryPolicy;
pub use service::{ServiceName, ServiceRegistry};
pub use transport::{AUTH_TOKEN_HEADER, BoxFuture, HttpSettings, HttpTransport, Transport};

#[cfg(test)]
pub(crate) use transport::MockTransport;
