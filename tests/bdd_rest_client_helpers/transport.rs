//! Fake transport serving scripted list pages.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use lyra::error::RestError;
use lyra::rest::{BoxFuture, RestRequest, RestResponse, ServiceName, Transport};
use serde_json::{Value, json};

use super::state::PageScript;

/// Serves pages by their `page` query parameter after an initial run of
/// failing responses.
pub(crate) struct PagedTransport {
    pub(crate) pages: Vec<PageScript>,
    pub(crate) advertised_pages: Option<u32>,
    pub(crate) failures_left: AtomicU32,
    pub(crate) failure_status: u16,
    pub(crate) requests: Arc<AtomicUsize>,
}

impl PagedTransport {
    fn respond(&self, request: &RestRequest) -> RestResponse {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return RestResponse::new(self.failure_status, "backend unavailable");
        }

        let page = request
            .query
            .iter()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok())
            .unwrap_or(1);
        let ids = self
            .pages
            .iter()
            .find(|(number, _)| *number == page)
            .map(|(_, ids)| ids.clone())
            .unwrap_or_default();
        let body: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
        let response = RestResponse::new(200, Value::Array(body).to_string());
        match self.advertised_pages {
            Some(total) => response.with_header("Pagination-Pages", &total.to_string()),
            None => response,
        }
    }
}

impl Transport for PagedTransport {
    fn execute(
        &self,
        _service: ServiceName,
        request: RestRequest,
    ) -> BoxFuture<'_, Result<RestResponse, RestError>> {
        let response = self.respond(&request);
        Box::pin(async move { Ok(response) })
    }
}
