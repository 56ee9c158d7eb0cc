//! HTTP transport for the backend services.
//!
//! [`Transport`] is the seam the rest of the client is written against; the
//! production [`HttpTransport`] sends requests with `reqwest`, attaches the
//! identity token and, in debug mode, logs every exchange.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::HeaderMap;
use url::Url;

use super::request::{RestRequest, RestResponse, prettify_body};
use super::service::{ServiceName, ServiceRegistry};
use crate::error::RestError;

/// A boxed future for async trait methods.
///
/// This type alias enables `mockall::automock` compatibility and trait object
/// usage for async methods in [`Transport`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Header carrying the identity token on every backend request.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const REDACTED: &str = "<redacted>";

/// Executes single requests against a logical service.
///
/// Any HTTP status is a successful exchange at this level; only failures to
/// obtain a response are errors.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Sends `request` to `service` and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Transport`] when no response was received and
    /// [`RestError::UnknownService`] for an unregistered service.
    fn execute(
        &self,
        service: ServiceName,
        request: RestRequest,
    ) -> BoxFuture<'_, Result<RestResponse, RestError>>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Log every request and response at debug level.
    pub debug: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            debug: false,
            timeout: Duration::from_secs(60),
        }
    }
}

/// `reqwest`-backed [`Transport`].
pub struct HttpTransport {
    client: reqwest::Client,
    registry: ServiceRegistry,
    token: String,
    debug: bool,
}

impl HttpTransport {
    /// Builds a transport for the services in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Transport`] if the HTTP client cannot be built
    /// (for example, when TLS initialisation fails).
    pub fn new(
        registry: ServiceRegistry,
        token: impl Into<String>,
        settings: HttpSettings,
    ) -> Result<Self, RestError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("lyra/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| RestError::Transport {
                url: String::new(),
                message: format!("failed to build HTTP client: {error}"),
            })?;
        Ok(Self {
            client,
            registry,
            token: token.into(),
            debug: settings.debug,
        })
    }

    /// Returns the registry this transport resolves services against.
    #[must_use]
    pub const fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    async fn send(
        &self,
        service: ServiceName,
        request: RestRequest,
    ) -> Result<RestResponse, RestError> {
        let url = self.registry.url(service, &request.path)?;
        if self.debug {
            log_request(&request, &url);
        }

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header(AUTH_TOKEN_HEADER, &self.token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|error| RestError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let raw = response.text().await.map_err(|error| RestError::Transport {
            url: url.to_string(),
            message: format!("failed to read response body: {error}"),
        })?;

        let rest_response = RestResponse {
            status,
            body: prettify_body(&raw),
            headers,
        };
        if self.debug {
            log_response(&rest_response, &url);
        }
        Ok(rest_response)
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        service: ServiceName,
        request: RestRequest,
    ) -> BoxFuture<'_, Result<RestResponse, RestError>> {
        Box::pin(self.send(service, request))
    }
}

fn log_request(request: &RestRequest, url: &Url) {
    let mut headers = vec![format!("{AUTH_TOKEN_HEADER}: {REDACTED}")];
    headers.extend(
        request
            .headers
            .iter()
            .map(|(name, value)| format!("{name}: {}", redact(name, value))),
    );
    tracing::debug!(
        method = %request.method,
        url = %url,
        headers = ?headers,
        body = request.body.as_deref().unwrap_or_default(),
        "http request"
    );
}

fn log_response(response: &RestResponse, url: &Url) {
    tracing::debug!(
        status = response.status,
        url = %url,
        headers = ?header_lines(&response.headers),
        body = %response.body,
        "http response"
    );
}

fn header_lines(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            let text = value.to_str().unwrap_or("<binary>");
            format!("{name}: {}", redact(name.as_str(), text))
        })
        .collect()
}

/// Hides token-bearing header values from the debug dump.
fn redact<'a>(name: &str, value: &'a str) -> &'a str {
    if name.eq_ignore_ascii_case(AUTH_TOKEN_HEADER) || name.eq_ignore_ascii_case("X-Subject-Token")
    {
        REDACTED
    } else {
        value
    }
}
