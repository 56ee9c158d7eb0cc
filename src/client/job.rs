//! Jobs on the arc service.

use serde_json::Value;

use super::run::decode;
use super::{LyraClient, require_id, require_reported_id, segment};
use crate::error::{RestError, Result};
use crate::rest::{RestRequest, ServiceName};
use crate::watch::JobStatus;

const JOBS: &str = "/api/v1/jobs";

impl LyraClient {
    /// Lists every job.
    ///
    /// # Errors
    ///
    /// Returns a REST error if any page fails.
    pub async fn list_jobs(&self) -> Result<Vec<Value>> {
        Ok(self
            .rest
            .list_all(ServiceName::Arc, &RestRequest::get(JOBS))
            .await?)
    }

    /// Fetches one job.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn get_job(&self, id: &str) -> Result<Value> {
        let job_id = require_id("id", id)?;
        let request = RestRequest::get(format!("{JOBS}/{}", segment(job_id)));
        Ok(self.rest.json(ServiceName::Arc, &request).await?)
    }

    /// Fetches the plain-text log of a job.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty id, or a REST error.
    pub async fn job_log(&self, id: &str) -> Result<String> {
        let job_id = require_id("id", id)?;
        let request = RestRequest::get(format!("{JOBS}/{}/log", segment(job_id)));
        Ok(self.rest.text(ServiceName::Arc, &request).await?)
    }

    pub(super) async fn job_snapshot(
        &self,
        id: &str,
    ) -> std::result::Result<JobStatus, RestError> {
        let job_id = require_reported_id("job", id)?;
        let request = RestRequest::get(format!("{JOBS}/{}", segment(job_id)));
        let value = self.rest.json(ServiceName::Arc, &request).await?;
        decode(value)
    }
}
