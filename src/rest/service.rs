//! Logical backend services and their base URLs.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::error::RestError;

/// A logical backend addressed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceName {
    /// The automation service (automations and runs).
    Automation,
    /// The arc service (agents/nodes and jobs).
    Arc,
}

impl ServiceName {
    /// Every service the client talks to.
    pub const ALL: [Self; 2] = [Self::Automation, Self::Arc];

    /// Returns the catalogue type name of the service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automation => "automation",
            Self::Arc => "arc",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from service to base URL.
///
/// URLs are parsed once at construction, so a registry that exists is known
/// to hold only valid endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    endpoints: BTreeMap<ServiceName, Url>,
}

impl ServiceRegistry {
    /// Builds a registry holding both backend services.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidUrl`] if either endpoint does not parse.
    pub fn new(automation: &str, arc: &str) -> Result<Self, RestError> {
        Self::from_entries([
            (ServiceName::Automation, automation),
            (ServiceName::Arc, arc),
        ])
    }

    /// Builds a registry from arbitrary entries.
    ///
    /// Services not listed stay unregistered; requests against them fail
    /// with [`RestError::UnknownService`].
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidUrl`] for the first endpoint that does
    /// not parse.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (ServiceName, &'a str)>,
    ) -> Result<Self, RestError> {
        let mut endpoints = BTreeMap::new();
        for (service, raw) in entries {
            let url = Url::parse(raw.trim_end_matches('/')).map_err(|error| {
                RestError::InvalidUrl {
                    url: raw.to_owned(),
                    message: error.to_string(),
                }
            })?;
            endpoints.insert(service, url);
        }
        Ok(Self { endpoints })
    }

    /// Returns the base URL registered for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::UnknownService`] if the service is not registered.
    pub fn base_url(&self, service: ServiceName) -> Result<&Url, RestError> {
        self.endpoints
            .get(&service)
            .ok_or_else(|| RestError::UnknownService {
                service: service.as_str().to_owned(),
            })
    }

    /// Joins a relative path onto the base URL of `service`.
    ///
    /// The base path is kept: `https://host/prefix` joined with
    /// `/api/v1/runs` yields `https://host/prefix/api/v1/runs`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::UnknownService`] for an unregistered service and
    /// [`RestError::InvalidUrl`] if the joined text does not parse.
    pub fn url(&self, service: ServiceName, path: &str) -> Result<Url, RestError> {
        let base = self.base_url(service)?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|error| RestError::InvalidUrl {
            url: joined.clone(),
            message: error.to_string(),
        })
    }
}
