//! Orchestration API for lyra commands.
//!
//! This module turns a parsed [`Commands`] value into calls on the
//! [`LyraClient`] and returns a [`CommandReport`]: the data to render and
//! the [`CommandOutcome`] the binary maps to an exit code. Nothing here
//! writes to stdout or calls `std::process::exit`; watch progress goes to
//! the supplied [`WatchReporter`].

mod commands;
mod session;


pub use commands::{
    AUTOMATION_COLUMNS, JOB_COLUMNS, NODE_COLUMNS, RUN_COLUMNS, automation_command, job_command,
    node_command, run_command,
};
pub use session::{authenticate, describe_session, resolve_session};

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::auth::IdentityProvider;
use crate::client::LyraClient;
use crate::config::{AppConfig, Commands};
use crate::error::{LyraError, OutputError, Result};
use crate::output::{OutputFormat, render};
use crate::watch::{WatchReporter, WatchSettings};

/// Outcome of a lyra command.
///
/// Commands either succeed outright or report a watched run that did not
/// complete; the CLI adapter maps the latter to a non-zero exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command completed successfully (exit code 0).
    Success,
    /// A watched run failed.
    RunFailed {
        /// The run that failed.
        run_id: String,
        /// The failure reason reported by the run.
        reason: String,
    },
    /// A watched run entered a state this client does not know.
    RunUnrecognised {
        /// The run being watched.
        run_id: String,
        /// The state it reported.
        state: String,
    },
}

impl CommandOutcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::RunFailed { .. } | Self::RunUnrecognised { .. } => 1,
        }
    }
}

/// Data produced by a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Structured data with the preferred table columns for lists.
    Value {
        /// The decoded value.
        value: Value,
        /// Column order for array tables; empty uses the element keys.
        columns: &'static [&'static str],
    },
    /// Plain text written verbatim in every format.
    Text(String),
}

impl CommandOutput {
    /// Wraps a single resource.
    #[must_use]
    pub const fn object(value: Value) -> Self {
        Self::Value { value, columns: &[] }
    }

    /// Wraps a list with its table columns.
    #[must_use]
    pub fn list(items: Vec<Value>, columns: &'static [&'static str]) -> Self {
        Self::Value {
            value: Value::Array(items),
            columns,
        }
    }

    /// Renders the output in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Render`] if JSON serialisation fails.
    pub fn render(&self, format: OutputFormat) -> std::result::Result<String, OutputError> {
        match self {
            Self::Value { value, columns } => render(value, format, columns),
            Self::Text(text) => Ok(text.clone()),
        }
    }
}

/// Data and outcome of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    /// What to print.
    pub output: CommandOutput,
    /// How the command ended.
    pub outcome: CommandOutcome,
}

impl CommandReport {
    /// A successful report carrying `output`.
    #[must_use]
    pub const fn success(output: CommandOutput) -> Self {
        Self {
            output,
            outcome: CommandOutcome::Success,
        }
    }
}

/// Runs one command end to end.
///
/// `authenticate` always requests a new token; every other command reuses
/// the configured token and endpoints when all three are present and
/// authenticates otherwise.
///
/// Cancelling `cancel` abandons any request still in flight. A watch that
/// sees the cancellation itself ends with [`WatchError::Cancelled`].
///
/// # Errors
///
/// Returns configuration, authentication, validation, REST, watch or output
/// errors from the steps involved, and [`LyraError::Interrupted`] when
/// `cancel` fires before the command finishes.
///
/// [`WatchError::Cancelled`]: crate::error::WatchError::Cancelled
pub async fn execute<E, R>(
    command: &Commands,
    config: &AppConfig,
    env: &E,
    provider: &dyn IdentityProvider,
    cancel: &CancellationToken,
    reporter: &mut R,
) -> Result<CommandReport>
where
    E: mockable::Env,
    R: WatchReporter,
{
    tokio::select! {
        biased;
        result = dispatch(command, config, env, provider, cancel, reporter) => result,
        () = cancel.cancelled() => Err(LyraError::Interrupted),
    }
}

async fn dispatch<E, R>(
    command: &Commands,
    config: &AppConfig,
    env: &E,
    provider: &dyn IdentityProvider,
    cancel: &CancellationToken,
    reporter: &mut R,
) -> Result<CommandReport>
where
    E: mockable::Env,
    R: WatchReporter,
{
    match command {
        Commands::Authenticate => {
            let session = authenticate(config, env, provider).await?;
            Ok(CommandReport::success(CommandOutput::object(
                describe_session(&session),
            )))
        }
        Commands::Automation { command: sub } => {
            let client = connect(config, env, provider).await?;
            let watch = WatchSettings::from_config(&config.watch);
            automation_command(&client, sub, &watch, cancel, reporter).await
        }
        Commands::Run { command: sub } => {
            run_command(&connect(config, env, provider).await?, sub).await
        }
        Commands::Job { command: sub } => {
            job_command(&connect(config, env, provider).await?, sub).await
        }
        Commands::Node { command: sub } => {
            node_command(&connect(config, env, provider).await?, sub).await
        }
    }
}

async fn connect<E: mockable::Env>(
    config: &AppConfig,
    env: &E,
    provider: &dyn IdentityProvider,
) -> Result<LyraClient> {
    let session = resolve_session(config, env, provider).await?;
    LyraClient::connect(&session, config)
}
