//! Progress events emitted while a run is watched.

use std::fmt;

use super::model::RunState;

/// Something observable that happened during a watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The watch started on a freshly created run.
    RunCreated {
        /// Run identifier.
        run_id: String,
        /// State reported at creation.
        state: RunState,
    },
    /// The run moved to a different state.
    RunStateChanged {
        /// Run identifier.
        run_id: String,
        /// Previous state.
        from: RunState,
        /// New state.
        to: RunState,
    },
    /// The run reported a job not seen before.
    JobDiscovered {
        /// Job identifier.
        job_id: String,
    },
    /// A tracked job reported a different status.
    JobStatusChanged {
        /// Job identifier.
        job_id: String,
        /// New status text.
        status: String,
        /// Agent executing the job, when known.
        agent: Option<String>,
    },
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunCreated { run_id, state } => write!(f, "Run {run_id} created ({state})"),
            Self::RunStateChanged { run_id, from, to } => {
                write!(f, "Run {run_id}: {from} -> {to}")
            }
            Self::JobDiscovered { job_id } => write!(f, "Job {job_id} discovered"),
            Self::JobStatusChanged {
                job_id,
                status,
                agent,
            } => match agent {
                Some(agent) => write!(f, "Job {job_id}: {status} on {agent}"),
                None => write!(f, "Job {job_id}: {status}"),
            },
        }
    }
}

/// Receives watch events as they happen.
pub trait WatchReporter {
    /// Handles one event.
    fn report(&mut self, event: &WatchEvent);
}

/// Collects events in memory.
impl WatchReporter for Vec<WatchEvent> {
    fn report(&mut self, event: &WatchEvent) {
        self.push(event.clone());
    }
}

/// Writes one line per event to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl WatchReporter for StderrReporter {
    #[expect(clippy::print_stderr, reason = "watch progress is user-facing output")]
    fn report(&mut self, event: &WatchEvent) {
        tracing::debug!(?event, "watch event");
        eprintln!("{event}");
    }
}
