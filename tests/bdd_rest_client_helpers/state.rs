//! Scenario state for REST client behavioural tests.

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Ids served on one page.
pub(crate) type PageScript = (u32, Vec<String>);

/// How a listing ended.
#[derive(Debug, Clone)]
pub(crate) enum ListingResult {
    /// Every page was collected.
    Items(Vec<String>),
    /// The listing failed with an HTTP status.
    Status(u16),
    /// The listing failed some other way.
    Other(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct RestClientState {
    pub(crate) pages: Slot<Vec<PageScript>>,
    pub(crate) advertised_pages: Slot<Option<u32>>,
    pub(crate) failures: Slot<(u32, u16)>,
    pub(crate) max_attempts: Slot<u32>,
    pub(crate) requests: Slot<usize>,
    pub(crate) result: Slot<ListingResult>,
}

#[fixture]
pub(crate) fn rest_client_state() -> RestClientState {
    let state = RestClientState::default();
    state.pages.set(Vec::new());
    state.advertised_pages.set(None);
    state.failures.set((0, 503));
    state.max_attempts.set(3);
    state
}
