//! Per-resource command handlers.

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{CommandOutcome, CommandOutput, CommandReport};
use crate::client::{ChefAutomation, LyraClient, ScriptAutomation};
use crate::config::{
    AutomationCommand, ChefAutomationArgs, CreateAutomationCommand, ExecuteArgs, JobCommand,
    NodeCommand, RunCommand, ScriptAutomationArgs, TagCommand,
};
use crate::error::{OutputError, Result};
use crate::watch::{WatchOutcome, WatchReporter, WatchSettings, watch_run};

/// Table columns for automation lists.
pub const AUTOMATION_COLUMNS: &[&str] =
    &["id", "name", "type", "repository", "repository_revision"];
/// Table columns for run lists.
pub const RUN_COLUMNS: &[&str] = &[
    "id",
    "automation_id",
    "automation_name",
    "state",
    "selector",
    "created_at",
];
/// Table columns for job lists.
pub const JOB_COLUMNS: &[&str] = &["request_id", "status", "to", "action", "created_at"];
/// Table columns for node lists.
pub const NODE_COLUMNS: &[&str] = &["id", "display_name", "hostname", "online", "updated_at"];

/// Handles `automation` subcommands.
///
/// `execute --watch` follows the new run and reports a failed or
/// unrecognised run through [`CommandOutcome`].
///
/// # Errors
///
/// Returns validation, REST, watch or output errors.
pub async fn automation_command<R: WatchReporter>(
    client: &LyraClient,
    command: &AutomationCommand,
    watch: &WatchSettings,
    cancel: &CancellationToken,
    reporter: &mut R,
) -> Result<CommandReport> {
    let output = match command {
        AutomationCommand::List => {
            CommandOutput::list(client.list_automations().await?, AUTOMATION_COLUMNS)
        }
        AutomationCommand::Show(args) => {
            CommandOutput::object(client.get_automation(&args.id).await?)
        }
        AutomationCommand::Create { command: kind } => {
            let body = match kind {
                CreateAutomationCommand::Script(args) => script_definition(args).to_body()?,
                CreateAutomationCommand::Chef(args) => chef_definition(args).to_body()?,
            };
            CommandOutput::object(client.create_automation(&body).await?)
        }
        AutomationCommand::Delete(args) => {
            CommandOutput::object(client.delete_automation(&args.id).await?)
        }
        AutomationCommand::Execute(args) => {
            return execute_automation(client, args, watch, cancel, reporter).await;
        }
    };
    Ok(CommandReport::success(output))
}

async fn execute_automation<R: WatchReporter>(
    client: &LyraClient,
    args: &ExecuteArgs,
    watch: &WatchSettings,
    cancel: &CancellationToken,
    reporter: &mut R,
) -> Result<CommandReport> {
    let run = client.create_run(&args.id, &args.selector).await?;
    tracing::debug!(run_id = %run.id, state = %run.state, "run created");
    if !args.watch {
        return Ok(CommandReport::success(CommandOutput::object(to_value(&run)?)));
    }

    let outcome = watch_run(client, run, watch, cancel, reporter).await?;
    let status = match &outcome {
        WatchOutcome::Completed { .. } => CommandOutcome::Success,
        WatchOutcome::Failed { run, reason } => CommandOutcome::RunFailed {
            run_id: run.id.clone(),
            reason: reason.clone(),
        },
        WatchOutcome::Unrecognised { run } => CommandOutcome::RunUnrecognised {
            run_id: run.id.clone(),
            state: run.state.to_string(),
        },
    };
    Ok(CommandReport {
        output: CommandOutput::object(to_value(&outcome)?),
        outcome: status,
    })
}

/// Handles `run` subcommands.
///
/// # Errors
///
/// Returns validation or REST errors.
pub async fn run_command(client: &LyraClient, command: &RunCommand) -> Result<CommandReport> {
    let output = match command {
        RunCommand::List => CommandOutput::list(client.list_runs().await?, RUN_COLUMNS),
        RunCommand::Show(args) => CommandOutput::object(client.get_run(&args.id).await?),
    };
    Ok(CommandReport::success(output))
}

/// Handles `job` subcommands.
///
/// # Errors
///
/// Returns validation or REST errors.
pub async fn job_command(client: &LyraClient, command: &JobCommand) -> Result<CommandReport> {
    let output = match command {
        JobCommand::List => CommandOutput::list(client.list_jobs().await?, JOB_COLUMNS),
        JobCommand::Show(args) => CommandOutput::object(client.get_job(&args.id).await?),
        JobCommand::Log(args) => CommandOutput::Text(client.job_log(&args.id).await?),
    };
    Ok(CommandReport::success(output))
}

/// Handles `node` subcommands.
///
/// # Errors
///
/// Returns validation or REST errors.
pub async fn node_command(client: &LyraClient, command: &NodeCommand) -> Result<CommandReport> {
    let output = match command {
        NodeCommand::List(args) => CommandOutput::list(
            client.list_nodes(args.selector.as_deref()).await?,
            NODE_COLUMNS,
        ),
        NodeCommand::Show(args) => CommandOutput::object(client.get_node(&args.id).await?),
        NodeCommand::Delete(args) => CommandOutput::object(client.delete_node(&args.id).await?),
        NodeCommand::Tag { command: tag } => match tag {
            TagCommand::List(args) => CommandOutput::object(client.node_tags(&args.id).await?),
            TagCommand::Add(args) => {
                CommandOutput::object(client.add_node_tags(&args.id, &args.tags).await?)
            }
            TagCommand::Delete(args) => {
                CommandOutput::object(client.delete_node_tag(&args.id, &args.key).await?)
            }
        },
    };
    Ok(CommandReport::success(output))
}

fn script_definition(args: &ScriptAutomationArgs) -> ScriptAutomation {
    ScriptAutomation {
        name: args.name.clone(),
        repository: args.repository.clone(),
        repository_revision: args.repository_revision.clone(),
        path: args.path.clone(),
        arguments: args.arguments.clone(),
        environment: args.environment.clone(),
        timeout: args.timeout,
    }
}

fn chef_definition(args: &ChefAutomationArgs) -> ChefAutomation {
    ChefAutomation {
        name: args.name.clone(),
        repository: args.repository.clone(),
        repository_revision: args.repository_revision.clone(),
        run_list: args.run_list.clone(),
        attributes: args.attributes.clone(),
        log_level: args.log_level.clone(),
        timeout: args.timeout,
    }
}

fn to_value<T: Serialize>(value: &T) -> std::result::Result<Value, OutputError> {
    serde_json::to_value(value).map_err(|error| OutputError::Render {
        message: error.to_string(),
    })
}
