//! Automation resources on the automation service.

use serde_json::{Map, Value, json};

use super::{LyraClient, require_id, require_text, segment};
use crate::error::{Result, ValidationError};
use crate::rest::{RestRequest, ServiceName};

const AUTOMATIONS: &str = "/api/v1/automations";

/// Definition of a script automation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAutomation {
    /// Automation name.
    pub name: String,
    /// Git repository holding the script.
    pub repository: String,
    /// Revision to check out.
    pub repository_revision: Option<String>,
    /// Script path inside the repository.
    pub path: String,
    /// Script arguments.
    pub arguments: Vec<String>,
    /// Environment in `KEY=value` form.
    pub environment: Vec<String>,
    /// Timeout in seconds.
    pub timeout: Option<u64>,
}

impl ScriptAutomation {
    /// Builds the creation request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for empty required fields or malformed
    /// environment entries.
    pub fn to_body(&self) -> std::result::Result<Value, ValidationError> {
        let mut body = common_body(
            "Script",
            &self.name,
            &self.repository,
            self.repository_revision.as_deref(),
            self.timeout,
        )?;
        body.insert(
            String::from("path"),
            Value::String(require_text("path", &self.path)?.to_owned()),
        );
        if !self.arguments.is_empty() {
            body.insert(String::from("arguments"), json!(self.arguments));
        }
        if !self.environment.is_empty() {
            body.insert(
                String::from("environment"),
                Value::Object(parse_pairs("environment", &self.environment)?),
            );
        }
        Ok(Value::Object(body))
    }
}

/// Definition of a Chef automation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChefAutomation {
    /// Automation name.
    pub name: String,
    /// Git repository holding the cookbooks.
    pub repository: String,
    /// Revision to check out.
    pub repository_revision: Option<String>,
    /// Run list entries.
    pub run_list: Vec<String>,
    /// Chef attributes as JSON object text.
    pub attributes: Option<String>,
    /// Chef log level.
    pub log_level: Option<String>,
    /// Timeout in seconds.
    pub timeout: Option<u64>,
}

impl ChefAutomation {
    /// Builds the creation request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for empty required fields, an empty run
    /// list, or attributes that are not a JSON object.
    pub fn to_body(&self) -> std::result::Result<Value, ValidationError> {
        let mut body = common_body(
            "Chef",
            &self.name,
            &self.repository,
            self.repository_revision.as_deref(),
            self.timeout,
        )?;
        if self.run_list.iter().all(|entry| entry.trim().is_empty()) {
            return Err(ValidationError::MissingArgument {
                field: String::from("runlist"),
            });
        }
        body.insert(String::from("run_list"), json!(self.run_list));
        if let Some(raw) = &self.attributes {
            let attributes = serde_json::from_str::<Value>(raw)
                .ok()
                .filter(Value::is_object)
                .ok_or_else(|| ValidationError::InvalidArgument {
                    field: String::from("attributes"),
                    reason: String::from("must be a JSON object"),
                })?;
            body.insert(String::from("chef_attributes"), attributes);
        }
        if let Some(level) = &self.log_level {
            body.insert(String::from("log_level"), Value::String(level.clone()));
        }
        Ok(Value::Object(body))
    }
}

fn common_body(
    kind: &str,
    name: &str,
    repository: &str,
    revision: Option<&str>,
    timeout: Option<u64>,
) -> std::result::Result<Map<String, Value>, ValidationError> {
    let mut body = Map::new();
    body.insert(
        String::from("name"),
        Value::String(require_text("name", name)?.to_owned()),
    );
    body.insert(String::from("type"), Value::String(kind.to_owned()));
    body.insert(
        String::from("repository"),
        Value::String(require_text("repository", repository)?.to_owned()),
    );
    if let Some(rev) = revision {
        body.insert(String::from("repository_revision"), Value::String(rev.to_owned()));
    }
    if let Some(secs) = timeout {
        body.insert(String::from("timeout"), Value::from(secs));
    }
    Ok(body)
}

/// Parses `KEY=value` entries into a JSON object.
pub(crate) fn parse_pairs(
    field: &str,
    entries: &[String],
) -> std::result::Result<Map<String, Value>, ValidationError> {
    let mut pairs = Map::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(ValidationError::InvalidArgument {
                field: field.to_owned(),
                reason: format!("'{entry}' is not in KEY=value form"),
            });
        };
        let trimmed_key = key.trim();
        if trimmed_key.is_empty() {
            return Err(ValidationError::InvalidArgument {
                field: field.to_owned(),
                reason: format!("'{entry}' has an empty key"),
            });
        }
        pairs.insert(trimmed_key.to_owned(), Value::String(value.to_owned()));
    }
    Ok(pairs)
}

impl LyraClient {
    /// Lists every automation.
    ///
    /// # Errors
    ///
    /// Returns a REST error if any page fails.
    pub async fn list_automations(&self) -> Result<Vec<Value>> {
        Ok(self
            .rest
            .list_all(ServiceName::Automation, &RestRequest::get(AUTOMATIONS))
            .await?)
    }

    /// Fetches one automation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn get_automation(&self, id: &str) -> Result<Value> {
        let automation_id = require_id("id", id)?;
        Ok(self
            .rest
            .json(
                ServiceName::Automation,
                &RestRequest::get(format!("{AUTOMATIONS}/{}", segment(automation_id))),
            )
            .await?)
    }

    /// Creates an automation from a prepared body.
    ///
    /// # Errors
    ///
    /// Returns a REST error if the service rejects the body.
    pub async fn create_automation(&self, body: &Value) -> Result<Value> {
        Ok(self
            .rest
            .json(
                ServiceName::Automation,
                &RestRequest::post(AUTOMATIONS).json(body),
            )
            .await?)
    }

    /// Deletes an automation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn delete_automation(&self, id: &str) -> Result<Value> {
        let automation_id = require_id("id", id)?;
        Ok(self
            .rest
            .json(
                ServiceName::Automation,
                &RestRequest::delete(format!("{AUTOMATIONS}/{}", segment(automation_id))),
            )
            .await?)
    }
}
