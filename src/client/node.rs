//! Nodes (agents) and their tags on the arc service.

use serde_json::{Map, Value};

use super::automation::parse_pairs;
use super::{LyraClient, require_id, require_text, segment};
use crate::error::{Result, ValidationError};
use crate::rest::{RestRequest, ServiceName};

const AGENTS: &str = "/api/v1/agents";

/// Parses `KEY=value` tag arguments into a JSON object.
///
/// # Errors
///
/// Returns [`ValidationError`] if no tags are given or one is malformed.
pub fn parse_tags(tags: &[String]) -> std::result::Result<Map<String, Value>, ValidationError> {
    if tags.is_empty() {
        return Err(ValidationError::MissingArgument {
            field: String::from("tags"),
        });
    }
    parse_pairs("tags", tags)
}

impl LyraClient {
    /// Lists nodes, optionally filtered by a selector.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank selector, or a REST error if
    /// any page fails.
    pub async fn list_nodes(&self, selector: Option<&str>) -> Result<Vec<Value>> {
        let mut request = RestRequest::get(AGENTS);
        if let Some(raw) = selector {
            request = request.query("q", require_text("selector", raw)?);
        }
        Ok(self.rest.list_all(ServiceName::Arc, &request).await?)
    }

    /// Fetches one node.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn get_node(&self, id: &str) -> Result<Value> {
        let node_id = require_id("id", id)?;
        Ok(self
            .rest
            .json(ServiceName::Arc, &RestRequest::get(format!("{AGENTS}/{}", segment(node_id))))
            .await?)
    }

    /// Deletes a node.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn delete_node(&self, id: &str) -> Result<Value> {
        let node_id = require_id("id", id)?;
        Ok(self
            .rest
            .json(ServiceName::Arc, &RestRequest::delete(format!("{AGENTS}/{}", segment(node_id))))
            .await?)
    }

    /// Lists the tags of a node.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn node_tags(&self, id: &str) -> Result<Value> {
        let node_id = require_id("id", id)?;
        Ok(self
            .rest
            .json(
                ServiceName::Arc,
                &RestRequest::get(format!("{AGENTS}/{}/tags", segment(node_id))),
            )
            .await?)
    }

    /// Adds or replaces tags on a node.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id or malformed tags, or a
    /// REST error.
    pub async fn add_node_tags(&self, id: &str, tags: &[String]) -> Result<Value> {
        let node_id = require_id("id", id)?;
        let body = Value::Object(parse_tags(tags)?);
        Ok(self
            .rest
            .json(
                ServiceName::Arc,
                &RestRequest::post(format!("{AGENTS}/{}/tags", segment(node_id))).json(&body),
            )
            .await?)
    }

    /// Removes one tag from a node.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id or key, or a REST error.
    pub async fn delete_node_tag(&self, id: &str, key: &str) -> Result<Value> {
        let node_id = require_id("id", id)?;
        let tag_key = require_id("key", key)?;
        Ok(self
            .rest
            .json(
                ServiceName::Arc,
                &RestRequest::delete(format!(
                    "{AGENTS}/{}/tags/{}",
                    segment(node_id),
                    segment(tag_key)
                )),
            )
            .await?)
    }
}
