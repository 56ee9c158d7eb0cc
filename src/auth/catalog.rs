//! Service catalogue returned with an identity token.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of a token response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenEnvelope {
    pub(crate) token: TokenBody,
}

/// The `token` object of a token response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenBody {
    pub(crate) expires_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) catalog: Vec<CatalogEntry>,
}

/// One service in the catalogue.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogEntry {
    #[serde(rename = "type")]
    pub(crate) service_type: String,
    #[serde(default)]
    pub(crate) endpoints: Vec<CatalogEndpoint>,
}

/// One endpoint of a catalogue service.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogEndpoint {
    pub(crate) interface: String,
    #[serde(default)]
    pub(crate) region: Option<String>,
    #[serde(default)]
    pub(crate) region_id: Option<String>,
    pub(crate) url: String,
}

impl CatalogEndpoint {
    fn in_region(&self, region: Option<&str>) -> bool {
        region.is_none_or(|wanted| {
            self.region.as_deref() == Some(wanted) || self.region_id.as_deref() == Some(wanted)
        })
    }
}

/// Finds the public URL of `service_type`, restricted to `region` when set.
pub(crate) fn public_endpoint<'a>(
    catalog: &'a [CatalogEntry],
    service_type: &str,
    region: Option<&str>,
) -> Option<&'a str> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|endpoint| endpoint.interface == "public" && endpoint.in_region(region))
        .map(|endpoint| endpoint.url.as_str())
}
