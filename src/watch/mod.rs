//! Following an automation run until it finishes.
//!
//! [`watch_run`] polls the run on a fixed interval, reports state changes,
//! discovers the jobs the run spawns and polls each of them until it
//! reaches `complete` or `failed`. The watch ends when:
//!
//! - the run is `completed` and every discovered job is terminal
//!   ([`WatchOutcome::Completed`]);
//! - the run is `failed`, without waiting for jobs
//!   ([`WatchOutcome::Failed`]);
//! - the run reports a state this client does not know
//!   ([`WatchOutcome::Unrecognised`]);
//! - a poll fails after retries, the token is cancelled, or the optional
//!   wall-clock ceiling passes (an error).

mod model;
mod reporter;


use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub use model::{JobStatus, Run, RunState};
pub use reporter::{StderrReporter, WatchEvent, WatchReporter};

use crate::config::WatchConfig;
use crate::error::{RestError, Result, WatchError};
use crate::rest::BoxFuture;

/// Reads run and job snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait RunApi: Send + Sync {
    /// Fetches the current snapshot of a run.
    ///
    /// # Errors
    ///
    /// Returns the REST error of the final attempt.
    fn fetch_run(&self, run_id: String) -> BoxFuture<'_, std::result::Result<Run, RestError>>;

    /// Fetches the current status of a job.
    ///
    /// # Errors
    ///
    /// Returns the REST error of the final attempt.
    fn fetch_job(&self, job_id: String)
    -> BoxFuture<'_, std::result::Result<JobStatus, RestError>>;
}

/// Timing of a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    /// Wait between polls.
    pub interval: Duration,
    /// Wall-clock ceiling for the whole watch; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl WatchSettings {
    /// Creates settings from the `[watch]` configuration section.
    ///
    /// A `timeout_secs` of zero disables the ceiling.
    #[must_use]
    pub const fn from_config(config: &WatchConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            timeout: if config.timeout_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(config.timeout_secs))
            },
        }
    }
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self::from_config(&WatchConfig::default())
    }
}

/// How a watched run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WatchOutcome {
    /// The run completed and every job finished.
    Completed {
        /// Final run snapshot.
        run: Run,
        /// Final status of every job, in discovery order.
        jobs: Vec<JobStatus>,
    },
    /// The run failed.
    Failed {
        /// Final run snapshot.
        run: Run,
        /// The run log, or a generic message when there is none.
        reason: String,
    },
    /// The run entered a state this client does not know.
    Unrecognised {
        /// Final run snapshot.
        run: Run,
    },
}

impl WatchOutcome {
    /// Whether the run completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// The final run snapshot.
    #[must_use]
    pub const fn run(&self) -> &Run {
        match self {
            Self::Completed { run, .. } | Self::Failed { run, .. } | Self::Unrecognised { run } => {
                run
            }
        }
    }
}

/// Jobs seen so far, in discovery order, with their last known status.
#[derive(Debug, Default)]
struct JobTracker {
    order: Vec<String>,
    statuses: HashMap<String, JobStatus>,
}

impl JobTracker {
    /// Starts tracking ids not seen before and announces each once.
    fn discover(&mut self, job_ids: &[String], reporter: &mut impl WatchReporter) {
        for job_id in job_ids {
            if self.order.contains(job_id) {
                continue;
            }
            self.order.push(job_id.clone());
            reporter.report(&WatchEvent::JobDiscovered {
                job_id: job_id.clone(),
            });
        }
    }

    fn is_terminal(&self, job_id: &str) -> bool {
        self.statuses.get(job_id).is_some_and(JobStatus::is_terminal)
    }

    fn all_terminal(&self) -> bool {
        self.order.iter().all(|job_id| self.is_terminal(job_id))
    }

    /// Polls every job that has not finished, reporting status changes.
    async fn poll<A: RunApi + ?Sized>(
        &mut self,
        api: &A,
        reporter: &mut impl WatchReporter,
    ) -> std::result::Result<(), RestError> {
        let pending = self
            .order
            .iter()
            .filter(|job_id| !self.is_terminal(job_id))
            .cloned()
            .collect::<Vec<_>>();

        for job_id in pending {
            let status = api.fetch_job(job_id.clone()).await?;
            let changed = self
                .statuses
                .get(&job_id)
                .is_none_or(|previous| previous.status != status.status);
            if changed {
                reporter.report(&WatchEvent::JobStatusChanged {
                    job_id: job_id.clone(),
                    status: status.status.clone(),
                    agent: status.agent.clone(),
                });
            }
            self.statuses.insert(job_id, status);
        }
        Ok(())
    }

    fn into_statuses(mut self) -> Vec<JobStatus> {
        self.order
            .iter()
            .filter_map(|job_id| self.statuses.remove(job_id))
            .collect()
    }
}

/// Watches `initial` until it reaches an outcome.
///
/// Every tick the run is fetched first (until it is `completed`), then each
/// unfinished job in discovery order. Progress goes to `reporter` as it
/// happens.
///
/// # Errors
///
/// Returns [`WatchError::Cancelled`] when `cancel` fires during a wait,
/// [`WatchError::TimedOut`] once the configured ceiling has passed at a
/// tick boundary, and the REST error of any poll that failed after retries.
pub async fn watch_run<A, R>(
    api: &A,
    initial: Run,
    settings: &WatchSettings,
    cancel: &CancellationToken,
    reporter: &mut R,
) -> Result<WatchOutcome>
where
    A: RunApi + ?Sized,
    R: WatchReporter,
{
    let started = Instant::now();
    let run_id = initial.id.clone();
    reporter.report(&WatchEvent::RunCreated {
        run_id: run_id.clone(),
        state: initial.state.clone(),
    });

    let mut jobs = JobTracker::default();
    jobs.discover(&initial.jobs, reporter);
    let mut run = initial;
    if let Some(outcome) = early_outcome(&run) {
        return Ok(outcome);
    }

    loop {
        if run.state == RunState::Completed && jobs.all_terminal() {
            return Ok(WatchOutcome::Completed {
                run,
                jobs: jobs.into_statuses(),
            });
        }

        wait_tick(settings.interval, cancel, &run_id).await?;
        if let Some(limit) = settings
            .timeout
            .filter(|limit| started.elapsed() >= *limit)
        {
            return Err(WatchError::TimedOut {
                run_id,
                seconds: limit.as_secs(),
            }
            .into());
        }

        if run.state != RunState::Completed {
            let next = api.fetch_run(run_id.clone()).await?;
            if next.state != run.state {
                reporter.report(&WatchEvent::RunStateChanged {
                    run_id: run_id.clone(),
                    from: run.state.clone(),
                    to: next.state.clone(),
                });
            }
            run = next;
            if let Some(outcome) = early_outcome(&run) {
                return Ok(outcome);
            }
            jobs.discover(&run.jobs, reporter);
        }

        jobs.poll(api, reporter).await?;
    }
}

/// Outcome that ends the watch regardless of jobs: a failed run or an
/// unknown state.
fn early_outcome(run: &Run) -> Option<WatchOutcome> {
    match &run.state {
        RunState::Failed => Some(WatchOutcome::Failed {
            reason: failure_reason(run),
            run: run.clone(),
        }),
        RunState::Other(_) => Some(WatchOutcome::Unrecognised { run: run.clone() }),
        RunState::Preparing | RunState::Executing | RunState::Completed => None,
    }
}

fn failure_reason(run: &Run) -> String {
    run.log
        .as_deref()
        .map(str::trim)
        .filter(|log| !log.is_empty())
        .map_or_else(|| format!("run {} failed", run.id), str::to_owned)
}

async fn wait_tick(
    interval: Duration,
    cancel: &CancellationToken,
    run_id: &str,
) -> std::result::Result<(), WatchError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(WatchError::Cancelled {
            run_id: run_id.to_owned(),
        }),
        () = tokio::time::sleep(interval) => Ok(()),
    }
}
