//! Given/when steps for REST client scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use lyra::error::RestError;
use lyra::rest::{PaginationSettings, RestClient, RestRequest, RetryPolicy, ServiceName};
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{ListingResult, RestClientState};
use super::transport::PagedTransport;

#[given("page {page} holds ids {ids}")]
fn given_page(rest_client_state: &RestClientState, page: u32, ids: String) {
    let mut pages = rest_client_state.pages.get().unwrap_or_default();
    let items = ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty() && *id != "nothing")
        .map(String::from)
        .collect();
    pages.push((page, items));
    rest_client_state.pages.set(pages);
}

#[given("the service advertises {total} pages")]
fn given_advertised_pages(rest_client_state: &RestClientState, total: u32) {
    rest_client_state.advertised_pages.set(Some(total));
}

#[given("the service answers {count} times with status {status} first")]
fn given_failures(rest_client_state: &RestClientState, count: u32, status: u16) {
    rest_client_state.failures.set((count, status));
}

#[given("calls are attempted at most {attempts} times")]
fn given_max_attempts(rest_client_state: &RestClientState, attempts: u32) {
    rest_client_state.max_attempts.set(attempts);
}

#[when("every run is listed")]
fn when_listed(rest_client_state: &RestClientState) -> StepResult<()> {
    let (failures, failure_status) = rest_client_state.failures.get().unwrap_or((0, 503));
    let requests = Arc::new(AtomicUsize::new(0));
    let transport = PagedTransport {
        pages: rest_client_state.pages.get().unwrap_or_default(),
        advertised_pages: rest_client_state.advertised_pages.get().flatten(),
        failures_left: AtomicU32::new(failures),
        failure_status,
        requests: Arc::clone(&requests),
    };
    let retry = RetryPolicy::new(
        rest_client_state.max_attempts.get().unwrap_or(3),
        Duration::ZERO,
        Duration::ZERO,
    );
    let client = RestClient::new(Box::new(transport), retry, PaginationSettings::default());

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let outcome = runtime.block_on(
        client.list_all(ServiceName::Automation, &RestRequest::get("/api/v1/runs")),
    );

    rest_client_state.requests.set(requests.load(Ordering::SeqCst));
    rest_client_state.result.set(match outcome {
        Ok(items) => ListingResult::Items(
            items
                .iter()
                .filter_map(|item| item.get("id").and_then(|id| id.as_str()))
                .map(String::from)
                .collect(),
        ),
        Err(RestError::HttpStatus { code, .. }) => ListingResult::Status(code),
        Err(other) => ListingResult::Other(other.to_string()),
    });
    Ok(())
}
