//! Assertion helpers for REST client behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{ListingResult, RestClientState};

#[then("the listed ids are {ids}")]
fn listed_ids(rest_client_state: &RestClientState, ids: String) -> StepResult<()> {
    let expected: Vec<String> = ids.split(',').map(|id| id.trim().to_owned()).collect();
    match rest_client_state.result.get() {
        Some(ListingResult::Items(actual)) if actual == expected => Ok(()),
        Some(other) => Err(format!("expected ids {expected:?}, got {other:?}")),
        None => Err(String::from("result should be set")),
    }
}

#[then("the listing fails with status {status}")]
fn listing_fails(rest_client_state: &RestClientState, status: u16) -> StepResult<()> {
    match rest_client_state.result.get() {
        Some(ListingResult::Status(code)) if code == status => Ok(()),
        Some(other) => Err(format!("expected HTTP {status}, got {other:?}")),
        None => Err(String::from("result should be set")),
    }
}

#[then("the service received {count} requests")]
fn service_received(rest_client_state: &RestClientState, count: usize) -> StepResult<()> {
    match rest_client_state.requests.get() {
        Some(actual) if actual == count => Ok(()),
        Some(actual) => Err(format!("expected {count} requests, got {actual}")),
        None => Err(String::from("request count should be set")),
    }
}
