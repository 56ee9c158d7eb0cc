//! Scenario state for run watch behavioural tests.

use lyra::watch::{WatchEvent, WatchOutcome};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// How a watch ended.
#[derive(Debug, Clone)]
pub(crate) enum WatchResult {
    /// The watch reached a terminal outcome.
    Finished(WatchOutcome),
    /// The watch stopped with an error.
    Stopped(String),
}

/// Scripted status sequence for one job.
pub(crate) type JobScript = (String, Vec<String>);

#[derive(Default, ScenarioState)]
pub(crate) struct RunWatchState {
    pub(crate) run_id: Slot<String>,
    pub(crate) initial_state: Slot<String>,
    pub(crate) later_states: Slot<Vec<String>>,
    pub(crate) jobs: Slot<Vec<String>>,
    pub(crate) job_scripts: Slot<Vec<JobScript>>,
    pub(crate) run_log: Slot<String>,
    pub(crate) timeout_ms: Slot<u64>,
    pub(crate) cancelled: Slot<bool>,
    pub(crate) events: Slot<Vec<WatchEvent>>,
    pub(crate) job_fetches: Slot<usize>,
    pub(crate) result: Slot<WatchResult>,
}

#[fixture]
pub(crate) fn run_watch_state() -> RunWatchState {
    let state = RunWatchState::default();
    state.run_id.set(String::from("r1"));
    state.initial_state.set(String::from("preparing"));
    state.later_states.set(Vec::new());
    state.jobs.set(Vec::new());
    state.job_scripts.set(Vec::new());
    state.cancelled.set(false);
    state
}
