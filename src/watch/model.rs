//! Run and job snapshots as returned by the backends.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// State of a run.
///
/// States the client does not know are kept verbatim in [`Self::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunState {
    /// The run is being set up.
    Preparing,
    /// Jobs are being dispatched and executed.
    Executing,
    /// Every job was dispatched and the run finished.
    Completed,
    /// The run failed.
    Failed,
    /// A state this client does not recognise.
    Other(String),
}

impl RunState {
    /// Returns the backend spelling of the state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Preparing => "preparing",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(state) => state,
        }
    }
}

impl From<String> for RunState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "preparing" => Self::Preparing,
            "executing" => Self::Executing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RunState {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<RunState> for String {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// Run identifier.
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    /// Current state.
    pub state: RunState,
    /// Jobs spawned so far, in dispatch order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub jobs: Vec<String>,
    /// Automation the run executes.
    #[serde(default, deserialize_with = "optional_id_text")]
    pub automation_id: Option<String>,
    /// Name of that automation.
    #[serde(default)]
    pub automation_name: Option<String>,
    /// Selector choosing the target nodes.
    #[serde(default)]
    pub selector: Option<String>,
    /// Run log; explains failures.
    #[serde(default)]
    pub log: Option<String>,
    /// Creation time as reported by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time as reported by the backend.
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Run {
    /// Creates a run snapshot with no jobs or metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, state: impl Into<RunState>) -> Self {
        Self {
            id: id.into(),
            state: state.into(),
            jobs: Vec::new(),
            automation_id: None,
            automation_name: None,
            selector: None,
            log: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns the snapshot with the given job list.
    #[must_use]
    pub fn with_jobs<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jobs = jobs.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the snapshot with the given log.
    #[must_use]
    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }
}

/// Status of one job on one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Job identifier.
    pub request_id: String,
    /// Backend status text.
    pub status: String,
    /// Agent executing the job.
    #[serde(default, alias = "to")]
    pub agent: Option<String>,
    /// Action the agent performs.
    #[serde(default)]
    pub action: Option<String>,
}

impl JobStatus {
    /// Creates a job status without agent or action.
    #[must_use]
    pub fn new(request_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: status.into(),
            agent: None,
            action: None,
        }
    }

    /// Whether the job has finished, successfully or not.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "complete" | "failed")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(serde_json::Number),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(text) => text,
            IdRepr::Number(number) => number.to_string(),
        }
    }
}

fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    IdRepr::deserialize(deserializer).map(String::from)
}

fn optional_id_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<IdRepr>::deserialize(deserializer).map(|id| id.map(String::from))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
