//! Typed operations on the automation and arc services.
//!
//! [`LyraClient`] wraps a [`RestClient`] and knows the resource paths of
//! both backends. Identifiers and selectors are validated before any
//! request is sent.

mod automation;
mod job;
mod node;
mod run;


use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, PercentEncode, utf8_percent_encode};

pub use automation::{ChefAutomation, ScriptAutomation};
pub use node::parse_tags;

use crate::auth::AuthContext;
use crate::config::AppConfig;
use crate::error::{RestError, Result, ValidationError};
use crate::rest::{HttpSettings, HttpTransport, PaginationSettings, RestClient, RetryPolicy};

/// Client for every resource the command line exposes.
pub struct LyraClient {
    rest: RestClient,
}

impl LyraClient {
    /// Wraps an existing REST client.
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Builds the HTTP stack for an authenticated session.
    ///
    /// # Errors
    ///
    /// Returns a REST error if an endpoint does not parse or the HTTP client
    /// cannot be built.
    pub fn connect(session: &AuthContext, config: &AppConfig) -> Result<Self> {
        let settings = HttpSettings {
            debug: config.http.debug,
            timeout: Duration::from_secs(config.http.timeout_secs),
        };
        let transport = HttpTransport::new(session.registry()?, session.token.clone(), settings)?;
        Ok(Self::new(RestClient::new(
            Box::new(transport),
            RetryPolicy::from_config(&config.retry),
            PaginationSettings::from_config(&config.pagination),
        )))
    }

    /// The underlying REST client.
    #[must_use]
    pub const fn rest(&self) -> &RestClient {
        &self.rest
    }
}

/// Bytes left as-is in a path segment: the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Rejects empty values and values that would change the request path.
///
/// Dot segments and `/` are refused outright; every other byte outside the
/// unreserved set is percent-encoded by [`segment`].
pub(crate) fn require_id<'a>(
    field: &str,
    value: &'a str,
) -> std::result::Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingArgument {
            field: field.to_owned(),
        });
    }
    if trimmed.contains('/') {
        return Err(ValidationError::InvalidArgument {
            field: field.to_owned(),
            reason: String::from("must not contain '/'"),
        });
    }
    if trimmed == "." || trimmed == ".." {
        return Err(ValidationError::InvalidArgument {
            field: field.to_owned(),
            reason: String::from("must not be a dot segment"),
        });
    }
    Ok(trimmed)
}

/// Checks an identifier taken from a service response.
pub(crate) fn require_reported_id<'a>(
    field: &str,
    value: &'a str,
) -> std::result::Result<&'a str, RestError> {
    require_id(field, value).map_err(|error| RestError::Decode {
        message: error.to_string(),
    })
}

/// Percent-encodes a validated identifier for use as one path segment.
pub(crate) fn segment(id: &str) -> PercentEncode<'_> {
    utf8_percent_encode(id, SEGMENT)
}

/// Rejects empty values.
pub(crate) fn require_text<'a>(
    field: &str,
    value: &'a str,
) -> std::result::Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingArgument {
            field: field.to_owned(),
        });
    }
    Ok(trimmed)
}
