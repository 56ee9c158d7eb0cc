//! Authentication against the identity service.
//!
//! Credentials come from the `[auth]` configuration section, with the usual
//! `OS_*` variables filling any field left empty. A successful request
//! yields an [`AuthContext`]: the token, its expiry and the public endpoints
//! of the automation and arc services taken from the service catalogue.

mod catalog;
mod credentials;
mod keystone;


use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

pub use credentials::{
    ApplicationCredentialRef, AuthMethod, Credentials, DomainRef, ProjectScope, UserRef,
};
pub use keystone::{KeystoneClient, SUBJECT_TOKEN_HEADER, token_url};

use crate::error::{AuthError, RestError};
use crate::rest::{BoxFuture, ServiceName, ServiceRegistry};

/// Token and service endpoints for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Token sent with every backend request.
    pub token: String,
    /// Expiry reported by the identity service; unknown for cached tokens.
    pub expires_at: Option<DateTime<Utc>>,
    /// Base URL per backend service.
    pub endpoints: BTreeMap<ServiceName, String>,
}

impl AuthContext {
    /// Builds a context from a token and endpoints already known to the
    /// configuration.
    #[must_use]
    pub fn cached(token: &str, automation: &str, arc: &str) -> Self {
        let endpoints = BTreeMap::from([
            (ServiceName::Automation, automation.to_owned()),
            (ServiceName::Arc, arc.to_owned()),
        ]);
        Self {
            token: token.to_owned(),
            expires_at: None,
            endpoints,
        }
    }

    /// Returns the endpoint of `service`, if known.
    #[must_use]
    pub fn endpoint(&self, service: ServiceName) -> Option<&str> {
        self.endpoints.get(&service).map(String::as_str)
    }

    /// Builds the service registry used by the REST transport.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidUrl`] if an endpoint does not parse.
    pub fn registry(&self) -> Result<ServiceRegistry, RestError> {
        ServiceRegistry::from_entries(
            self.endpoints
                .iter()
                .map(|(service, url)| (*service, url.as_str())),
        )
    }
}

/// Issues tokens for resolved credentials.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Requests a token and looks up the service endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] when the identity service
    /// rejects the request or cannot be reached, and
    /// [`AuthError::EndpointNotFound`] when the catalogue lacks a service.
    fn authenticate(
        &self,
        credentials: Credentials,
    ) -> BoxFuture<'_, Result<AuthContext, AuthError>>;
}
