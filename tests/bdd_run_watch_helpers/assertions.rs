//! Assertion helpers for run watch behavioural tests.

use lyra::watch::{WatchEvent, WatchOutcome};
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{RunWatchState, WatchResult};

fn finished(run_watch_state: &RunWatchState) -> StepResult<WatchOutcome> {
    match run_watch_state.result.get() {
        Some(WatchResult::Finished(outcome)) => Ok(outcome),
        Some(WatchResult::Stopped(message)) => {
            Err(format!("expected a terminal outcome, got error: {message}"))
        }
        None => Err(String::from("result should be set")),
    }
}

fn stopped(run_watch_state: &RunWatchState) -> StepResult<String> {
    match run_watch_state.result.get() {
        Some(WatchResult::Stopped(message)) => Ok(message),
        Some(WatchResult::Finished(outcome)) => {
            Err(format!("expected the watch to stop, got {outcome:?}"))
        }
        None => Err(String::from("result should be set")),
    }
}

#[then("the watch completes with {count} finished jobs")]
fn watch_completes(run_watch_state: &RunWatchState, count: usize) -> StepResult<()> {
    match finished(run_watch_state)? {
        WatchOutcome::Completed { jobs, .. } if jobs.len() == count => Ok(()),
        WatchOutcome::Completed { jobs, .. } => {
            Err(format!("expected {count} jobs, got {}", jobs.len()))
        }
        other => Err(format!("expected completion, got {other:?}")),
    }
}

#[then("the watch fails with reason {reason}")]
fn watch_fails(run_watch_state: &RunWatchState, reason: String) -> StepResult<()> {
    match finished(run_watch_state)? {
        WatchOutcome::Failed { reason: actual, .. } if actual == reason => Ok(()),
        other => Err(format!("expected failure '{reason}', got {other:?}")),
    }
}

#[then("the watch reports an unrecognised state")]
fn watch_unrecognised(run_watch_state: &RunWatchState) -> StepResult<()> {
    match finished(run_watch_state)? {
        WatchOutcome::Unrecognised { .. } => Ok(()),
        other => Err(format!("expected an unrecognised state, got {other:?}")),
    }
}

#[then("the watch stops with an error mentioning {text}")]
fn watch_stops(run_watch_state: &RunWatchState, text: String) -> StepResult<()> {
    let message = stopped(run_watch_state)?;
    if message.contains(&text) {
        Ok(())
    } else {
        Err(format!("expected error mentioning '{text}', got '{message}'"))
    }
}

#[then("job {job_id} is announced once")]
fn job_announced_once(run_watch_state: &RunWatchState, job_id: String) -> StepResult<()> {
    let events = run_watch_state.events.get().unwrap_or_default();
    let announcements = events
        .iter()
        .filter(|event| matches!(event, WatchEvent::JobDiscovered { job_id: id } if *id == job_id))
        .count();
    if announcements == 1 {
        Ok(())
    } else {
        Err(format!("job {job_id} announced {announcements} times"))
    }
}

#[then("the events include {line}")]
fn events_include(run_watch_state: &RunWatchState, line: String) -> StepResult<()> {
    let events = run_watch_state.events.get().unwrap_or_default();
    if events.iter().any(|event| event.to_string() == line) {
        Ok(())
    } else {
        let rendered: Vec<String> = events.iter().map(ToString::to_string).collect();
        Err(format!("'{line}' not among {rendered:?}"))
    }
}

#[then("no job status was fetched")]
fn no_job_fetched(run_watch_state: &RunWatchState) -> StepResult<()> {
    match run_watch_state.job_fetches.get() {
        Some(0) => Ok(()),
        Some(count) => Err(format!("expected no job fetches, got {count}")),
        None => Err(String::from("job fetch count should be set")),
    }
}
