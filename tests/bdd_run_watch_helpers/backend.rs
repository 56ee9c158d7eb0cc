//! Scripted stand-in for the automation and arc services.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use lyra::error::RestError;
use lyra::rest::BoxFuture;
use lyra::watch::{JobStatus, Run, RunApi};

/// Answers run and job fetches from queues; the last entry repeats.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    runs: Mutex<VecDeque<Run>>,
    jobs: Mutex<HashMap<String, VecDeque<JobStatus>>>,
    job_fetches: AtomicUsize,
}

impl ScriptedBackend {
    pub(crate) fn new(runs: Vec<Run>) -> Self {
        Self {
            runs: Mutex::new(runs.into()),
            ..Self::default()
        }
    }

    pub(crate) fn script_job(&self, job_id: &str, statuses: &[String]) {
        let queue = statuses
            .iter()
            .map(|status| JobStatus::new(job_id, status.as_str()))
            .collect();
        self.jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(job_id.to_owned(), queue);
    }

    pub(crate) fn job_fetches(&self) -> usize {
        self.job_fetches.load(Ordering::SeqCst)
    }
}

fn next_entry<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn not_found(what: &str) -> RestError {
    RestError::HttpStatus {
        code: 404,
        body: format!("{what} not scripted"),
    }
}

impl RunApi for ScriptedBackend {
    fn fetch_run(&self, run_id: String) -> BoxFuture<'_, Result<Run, RestError>> {
        let next = next_entry(
            &mut self
                .runs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        );
        Box::pin(async move { next.ok_or_else(|| not_found(&format!("run {run_id}"))) })
    }

    fn fetch_job(&self, job_id: String) -> BoxFuture<'_, Result<JobStatus, RestError>> {
        self.job_fetches.fetch_add(1, Ordering::SeqCst);
        let next = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get_mut(&job_id)
            .and_then(next_entry);
        Box::pin(async move { next.ok_or_else(|| not_found(&format!("job {job_id}"))) })
    }
}
