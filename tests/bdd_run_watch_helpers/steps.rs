//! Given/when steps for run watch scenarios.

use std::time::Duration;

use lyra::watch::{Run, WatchEvent, WatchSettings, watch_run};
use rstest_bdd_macros::{given, when};
use tokio_util::sync::CancellationToken;

use super::StepResult;
use super::backend::ScriptedBackend;
use super::state::{RunWatchState, WatchResult};

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[given("a run {run_id} in state {state}")]
fn given_run(run_watch_state: &RunWatchState, run_id: String, state: String) {
    run_watch_state.run_id.set(run_id);
    run_watch_state.initial_state.set(state);
}

#[given("the run then reports states {states}")]
fn given_later_states(run_watch_state: &RunWatchState, states: String) {
    run_watch_state.later_states.set(split_list(&states));
}

#[given("the run dispatches jobs {jobs}")]
fn given_jobs(run_watch_state: &RunWatchState, jobs: String) {
    run_watch_state.jobs.set(split_list(&jobs));
}

#[given("job {job_id} reports statuses {statuses}")]
fn given_job_statuses(run_watch_state: &RunWatchState, job_id: String, statuses: String) {
    let mut scripts = run_watch_state.job_scripts.get().unwrap_or_default();
    scripts.push((job_id, split_list(&statuses)));
    run_watch_state.job_scripts.set(scripts);
}

#[given("the run log reads {log}")]
fn given_run_log(run_watch_state: &RunWatchState, log: String) {
    run_watch_state.run_log.set(log);
}

#[given("the watch gives up after {millis} milliseconds")]
fn given_timeout(run_watch_state: &RunWatchState, millis: u64) {
    run_watch_state.timeout_ms.set(millis);
}

#[given("the user has already interrupted the watch")]
fn given_cancelled(run_watch_state: &RunWatchState) {
    run_watch_state.cancelled.set(true);
}

fn snapshot(run_watch_state: &RunWatchState, run_id: &str, state: &str) -> Run {
    let jobs = run_watch_state.jobs.get().unwrap_or_default();
    let run = Run::new(run_id, state).with_jobs(jobs);
    match run_watch_state.run_log.get() {
        Some(log) => run.with_log(log),
        None => run,
    }
}

#[when("the run is watched")]
fn when_run_watched(run_watch_state: &RunWatchState) -> StepResult<()> {
    let run_id = run_watch_state
        .run_id
        .get()
        .ok_or_else(|| String::from("run id should be configured"))?;
    let initial_state = run_watch_state
        .initial_state
        .get()
        .ok_or_else(|| String::from("initial state should be configured"))?;

    let later: Vec<Run> = run_watch_state
        .later_states
        .get()
        .unwrap_or_default()
        .iter()
        .map(|state| snapshot(run_watch_state, &run_id, state))
        .collect();
    let backend = ScriptedBackend::new(later);
    for (job_id, statuses) in run_watch_state.job_scripts.get().unwrap_or_default() {
        backend.script_job(&job_id, &statuses);
    }

    let settings = WatchSettings {
        interval: Duration::from_millis(1),
        timeout: run_watch_state.timeout_ms.get().map(Duration::from_millis),
    };
    let cancel = CancellationToken::new();
    if run_watch_state.cancelled.get().unwrap_or(false) {
        cancel.cancel();
    }

    let runtime =
        tokio::runtime::Runtime::new().map_err(|e| format!("failed to create runtime: {e}"))?;
    let mut events: Vec<WatchEvent> = Vec::new();
    let initial = Run::new(run_id.as_str(), initial_state.as_str());
    let outcome = runtime.block_on(watch_run(&backend, initial, &settings, &cancel, &mut events));

    run_watch_state.events.set(events);
    run_watch_state.job_fetches.set(backend.job_fetches());
    run_watch_state.result.set(match outcome {
        Ok(finished) => WatchResult::Finished(finished),
        Err(e) => WatchResult::Stopped(e.to_string()),
    });
    Ok(())
}
