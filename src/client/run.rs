//! Runs on the automation service.

use serde_json::{Value, json};

use super::{LyraClient, require_id, require_reported_id, require_text, segment};
use crate::error::{RestError, Result};
use crate::rest::{BoxFuture, RestRequest, ServiceName};
use crate::watch::{JobStatus, Run, RunApi};

const RUNS: &str = "/api/v1/runs";

impl LyraClient {
    /// Lists every run.
    ///
    /// # Errors
    ///
    /// Returns a REST error if any page fails.
    pub async fn list_runs(&self) -> Result<Vec<Value>> {
        Ok(self
            .rest
            .list_all(ServiceName::Automation, &RestRequest::get(RUNS))
            .await?)
    }

    /// Fetches one run as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn get_run(&self, id: &str) -> Result<Value> {
        let run_id = require_id("id", id)?;
        let request = RestRequest::get(format!("{RUNS}/{}", segment(run_id)));
        Ok(self.rest.json(ServiceName::Automation, &request).await?)
    }

    /// Starts a run of an automation on the nodes matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id or selector, or a REST
    /// error. A response that is not a run is a decode error.
    pub async fn create_run(&self, automation_id: &str, selector: &str) -> Result<Run> {
        let automation = require_id("id", automation_id)?;
        let node_selector = require_text("selector", selector)?;
        let body = json!({ "automation_id": automation, "selector": node_selector });
        let value = self
            .rest
            .json(ServiceName::Automation, &RestRequest::post(RUNS).json(&body))
            .await?;
        Ok(decode(value)?)
    }

    async fn run_snapshot(&self, id: &str) -> std::result::Result<Run, RestError> {
        let run_id = require_reported_id("run", id)?;
        let request = RestRequest::get(format!("{RUNS}/{}", segment(run_id)));
        let value = self.rest.json(ServiceName::Automation, &request).await?;
        decode(value)
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    value: Value,
) -> std::result::Result<T, RestError> {
    serde_json::from_value(value).map_err(|error| RestError::Decode {
        message: error.to_string(),
    })
}

impl RunApi for LyraClient {
    fn fetch_run(&self, run_id: String) -> BoxFuture<'_, std::result::Result<Run, RestError>> {
        Box::pin(async move { self.run_snapshot(&run_id).await })
    }

    fn fetch_job(
        &self,
        job_id: String,
    ) -> BoxFuture<'_, std::result::Result<JobStatus, RestError>> {
        Box::pin(async move { self.job_snapshot(&job_id).await })
    }
}
