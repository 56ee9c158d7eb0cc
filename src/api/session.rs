//! Session resolution: cached token and endpoints, or a fresh token.

use serde_json::{Value, json};

use crate::auth::{AuthContext, Credentials, IdentityProvider};
use crate::config::AppConfig;
use crate::error::Result;
use crate::rest::ServiceName;

/// Returns the configured session, authenticating only when the token or
/// an endpoint is missing.
///
/// Endpoints set in the configuration override the catalogue's after a
/// fresh authentication.
///
/// # Errors
///
/// Returns [`crate::error::AuthError`] when authentication is needed and
/// fails.
pub async fn resolve_session<E: mockable::Env>(
    config: &AppConfig,
    env: &E,
    provider: &dyn IdentityProvider,
) -> Result<AuthContext> {
    if let Some((token, automation, arc)) = config.cached_session() {
        tracing::debug!("using configured token and endpoints");
        return Ok(AuthContext::cached(token, automation, arc));
    }
    authenticate(config, env, provider).await
}

/// Requests a new token regardless of any configured one.
///
/// # Errors
///
/// Returns [`crate::error::AuthError::MissingCredentials`] before any
/// request when credentials are incomplete, or the provider's error.
pub async fn authenticate<E: mockable::Env>(
    config: &AppConfig,
    env: &E,
    provider: &dyn IdentityProvider,
) -> Result<AuthContext> {
    let credentials = Credentials::resolve(&config.auth, env)?;
    let mut session = provider.authenticate(credentials).await?;

    let overrides = [
        (ServiceName::Automation, config.automation_endpoint.as_deref()),
        (ServiceName::Arc, config.arc_endpoint.as_deref()),
    ];
    for (service, endpoint) in overrides {
        if let Some(url) = endpoint.filter(|url| !url.trim().is_empty()) {
            session.endpoints.insert(service, url.to_owned());
        }
    }
    Ok(session)
}

/// Summarises a session for the `authenticate` command.
#[must_use]
pub fn describe_session(session: &AuthContext) -> Value {
    json!({
        "token": session.token,
        "expires_at": session.expires_at.map(|expiry| expiry.to_rfc3339()),
        "automation_endpoint": session.endpoint(ServiceName::Automation),
        "arc_endpoint": session.endpoint(ServiceName::Arc),
    })
}
