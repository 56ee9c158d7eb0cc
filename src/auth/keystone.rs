//! Identity v3 token requests.

use std::collections::BTreeMap;
use std::time::Duration;

use super::catalog::{TokenEnvelope, public_endpoint};
use super::credentials::Credentials;
use super::{AuthContext, IdentityProvider};
use crate::error::AuthError;
use crate::rest::{BoxFuture, ServiceName, prettify_body};

/// Header carrying the issued token in the identity response.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// [`IdentityProvider`] talking to an identity v3 service over HTTP.
pub struct KeystoneClient {
    client: reqwest::Client,
}

impl KeystoneClient {
    /// Builds a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] if the HTTP client cannot
    /// be built.
    pub fn new(timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("lyra/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| AuthError::AuthenticationFailed {
                message: format!("failed to build HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }

    async fn request_token(&self, credentials: Credentials) -> Result<AuthContext, AuthError> {
        let url = token_url(&credentials.auth_url);
        tracing::debug!(url = %url, "requesting identity token");

        let response = self
            .client
            .post(&url)
            .json(&credentials.request_body())
            .send()
            .await
            .map_err(|error| AuthError::AuthenticationFailed {
                message: format!("request to {url} failed: {error}"),
            })?;

        let status = response.status();
        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|error| AuthError::AuthenticationFailed {
                message: format!("failed to read identity response: {error}"),
            })?;

        if !status.is_success() {
            return Err(AuthError::AuthenticationFailed {
                message: format!(
                    "identity service returned HTTP {}: {}",
                    status.as_u16(),
                    prettify_body(&body)
                ),
            });
        }

        let token = token.ok_or_else(|| AuthError::AuthenticationFailed {
            message: format!("identity response carried no {SUBJECT_TOKEN_HEADER} header"),
        })?;
        let envelope: TokenEnvelope =
            serde_json::from_str(&body).map_err(|error| AuthError::AuthenticationFailed {
                message: format!("failed to decode identity response: {error}"),
            })?;

        let region = credentials.region.as_deref();
        let mut endpoints = BTreeMap::new();
        for service in ServiceName::ALL {
            let url = public_endpoint(&envelope.token.catalog, service.as_str(), region)
                .ok_or_else(|| AuthError::EndpointNotFound {
                    service: service.as_str().to_owned(),
                })?;
            endpoints.insert(service, url.trim_end_matches('/').to_owned());
        }

        tracing::info!(expires_at = %envelope.token.expires_at, "authenticated");
        Ok(AuthContext {
            token,
            expires_at: Some(envelope.token.expires_at),
            endpoints,
        })
    }
}

impl IdentityProvider for KeystoneClient {
    fn authenticate(
        &self,
        credentials: Credentials,
    ) -> BoxFuture<'_, Result<AuthContext, AuthError>> {
        Box::pin(self.request_token(credentials))
    }
}

/// Returns the token endpoint for `auth_url`, adding `/v3` when the URL
/// carries no version.
#[must_use]
pub fn token_url(auth_url: &str) -> String {
    let base = auth_url.trim_end_matches('/');
    if base.ends_with("/v3") {
        format!("{base}/auth/tokens")
    } else {
        format!("{base}/v3/auth/tokens")
    }
}
