//! Retry- and pagination-aware REST client.

use serde_json::Value;

use super::pagination::{PaginationSettings, PaginationState};
use super::request::{RestRequest, RestResponse};
use super::retry::RetryPolicy;
use super::service::ServiceName;
use super::transport::Transport;
use crate::error::RestError;

/// REST client shared by every command.
///
/// Each HTTP call goes through the [`RetryPolicy`]; list calls are
/// collected across pages before they are returned.
pub struct RestClient {
    transport: Box<dyn Transport>,
    retry: RetryPolicy,
    pagination: PaginationSettings,
}

impl RestClient {
    /// Creates a client over `transport`.
    #[must_use]
    pub fn new(
        transport: Box<dyn Transport>,
        retry: RetryPolicy,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            transport,
            retry,
            pagination,
        }
    }

    /// Sends one request under the retry policy.
    ///
    /// Statuses below 500 are returned for the caller to inspect.
    ///
    /// # Errors
    ///
    /// Returns the retry policy's final error.
    pub async fn send(
        &self,
        service: ServiceName,
        request: &RestRequest,
    ) -> Result<RestResponse, RestError> {
        self.retry
            .run(|| self.transport.execute(service, request.clone()))
            .await
    }

    /// Sends a request and decodes a successful JSON body.
    ///
    /// An empty body decodes to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::HttpStatus`] for a status of 400 or above and
    /// [`RestError::Decode`] for a body that is not JSON.
    pub async fn json(
        &self,
        service: ServiceName,
        request: &RestRequest,
    ) -> Result<Value, RestError> {
        let response = self.send(service, request).await?.error_for_status()?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        response.json()
    }

    /// Sends a request and returns a successful body as text.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::HttpStatus`] for a status of 400 or above.
    pub async fn text(
        &self,
        service: ServiceName,
        request: &RestRequest,
    ) -> Result<String, RestError> {
        let response = self.send(service, request).await?.error_for_status()?;
        Ok(response.body)
    }

    /// Fetches every page of a list endpoint and concatenates the elements.
    ///
    /// Pages are requested one after another with a `page` query parameter
    /// starting at 1. The page count comes from the service's pages header
    /// on the first response; without it the first page is the only one.
    ///
    /// # Errors
    ///
    /// Any failing page aborts the whole call: [`RestError::HttpStatus`] for
    /// a status of 400 or above, [`RestError::Decode`] for a body that is not
    /// a JSON array, or the retry policy's final error.
    pub async fn list_all(
        &self,
        service: ServiceName,
        request: &RestRequest,
    ) -> Result<Vec<Value>, RestError> {
        let pages_header = self.pagination.pages_header(service);
        let first = self
            .send(service, &request.with_query_replaced("page", "1"))
            .await?
            .error_for_status()?;
        let mut state = PaginationState::from_first_page(&first, pages_header)?;
        tracing::debug!(
            service = %service,
            path = %request.path,
            pages = state.total_pages_hint(),
            "collecting paginated list"
        );

        while let Some(page) = state.next_page() {
            let response = self
                .send(
                    service,
                    &request.with_query_replaced("page", &page.to_string()),
                )
                .await?
                .error_for_status()?;
            state.append(&response)?;
        }

        Ok(state.into_items())
    }
}
