//! Command-line argument definitions for lyra.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Command-line interface for lyra.
#[derive(Debug, Parser)]
#[command(name = "lyra")]
#[command(
    author,
    version,
    about = "Manage automations, runs, jobs and nodes of the automation and arc services"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Token to use instead of authenticating.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Base URL of the automation service.
    #[arg(long, global = true)]
    pub automation_endpoint: Option<String>,

    /// Base URL of the arc service.
    #[arg(long, global = true)]
    pub arc_endpoint: Option<String>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log every HTTP request and response.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Authenticate and print the token and service endpoints.
    Authenticate,

    /// Manage automations.
    Automation {
        /// Automation subcommand.
        #[command(subcommand)]
        command: AutomationCommand,
    },

    /// Inspect automation runs.
    Run {
        /// Run subcommand.
        #[command(subcommand)]
        command: RunCommand,
    },

    /// Inspect jobs dispatched to nodes.
    Job {
        /// Job subcommand.
        #[command(subcommand)]
        command: JobCommand,
    },

    /// Manage nodes.
    Node {
        /// Node subcommand.
        #[command(subcommand)]
        command: NodeCommand,
    },
}

/// Automation subcommands.
#[derive(Debug, Subcommand)]
pub enum AutomationCommand {
    /// List all automations.
    List,
    /// Show one automation.
    Show(IdArgs),
    /// Create an automation.
    Create {
        /// Kind of automation to create.
        #[command(subcommand)]
        command: CreateAutomationCommand,
    },
    /// Delete an automation.
    Delete(IdArgs),
    /// Execute an automation on the nodes matching a selector.
    Execute(ExecuteArgs),
}

/// Automation kinds that can be created.
#[derive(Debug, Subcommand)]
pub enum CreateAutomationCommand {
    /// Create a script automation.
    Script(ScriptAutomationArgs),
    /// Create a Chef automation.
    Chef(ChefAutomationArgs),
}

/// Run subcommands.
#[derive(Debug, Subcommand)]
pub enum RunCommand {
    /// List all runs.
    List,
    /// Show one run.
    Show(IdArgs),
}

/// Job subcommands.
#[derive(Debug, Subcommand)]
pub enum JobCommand {
    /// List all jobs.
    List,
    /// Show one job.
    Show(IdArgs),
    /// Print the log of a job.
    Log(IdArgs),
}

/// Node subcommands.
#[derive(Debug, Subcommand)]
pub enum NodeCommand {
    /// List nodes, optionally filtered by a selector.
    List(NodeListArgs),
    /// Show one node.
    Show(IdArgs),
    /// Delete a node.
    Delete(IdArgs),
    /// Manage node tags.
    Tag {
        /// Tag subcommand.
        #[command(subcommand)]
        command: TagCommand,
    },
}

/// Node tag subcommands.
#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// List the tags of a node.
    List(IdArgs),
    /// Add or replace tags on a node.
    Add(TagAddArgs),
    /// Remove a tag from a node.
    Delete(TagDeleteArgs),
}

/// A single resource identifier.
#[derive(Debug, Args)]
pub struct IdArgs {
    /// Resource identifier.
    #[arg(required = true)]
    pub id: String,
}

/// Arguments for `automation execute`.
#[derive(Debug, Args)]
pub struct ExecuteArgs {
    /// Automation identifier.
    #[arg(required = true)]
    pub id: String,

    /// Selector choosing the target nodes.
    #[arg(long, required = true)]
    pub selector: String,

    /// Follow the run until it finishes.
    #[arg(long)]
    pub watch: bool,
}

/// Arguments for `automation create script`.
#[derive(Debug, Args)]
pub struct ScriptAutomationArgs {
    /// Automation name.
    #[arg(long, required = true)]
    pub name: String,

    /// Git repository holding the script.
    #[arg(long, required = true)]
    pub repository: String,

    /// Repository revision to check out.
    #[arg(long)]
    pub repository_revision: Option<String>,

    /// Path of the script inside the repository.
    #[arg(long, required = true)]
    pub path: String,

    /// Argument passed to the script (repeatable).
    #[arg(long = "argument")]
    pub arguments: Vec<String>,

    /// Environment variable in `KEY=value` form (repeatable).
    #[arg(long = "environment")]
    pub environment: Vec<String>,

    /// Timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for `automation create chef`.
#[derive(Debug, Args)]
pub struct ChefAutomationArgs {
    /// Automation name.
    #[arg(long, required = true)]
    pub name: String,

    /// Git repository holding the cookbooks.
    #[arg(long, required = true)]
    pub repository: String,

    /// Repository revision to check out.
    #[arg(long)]
    pub repository_revision: Option<String>,

    /// Run list entry, for example `recipe[nginx]` (repeatable).
    #[arg(long = "runlist", required = true)]
    pub run_list: Vec<String>,

    /// Chef attributes as a JSON object.
    #[arg(long)]
    pub attributes: Option<String>,

    /// Chef log level.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for `node list`.
#[derive(Debug, Args)]
pub struct NodeListArgs {
    /// Selector filtering the nodes.
    #[arg(long)]
    pub selector: Option<String>,
}

/// Arguments for `node tag add`.
#[derive(Debug, Args)]
pub struct TagAddArgs {
    /// Node identifier.
    #[arg(required = true)]
    pub id: String,

    /// Tags in `KEY=value` form.
    #[arg(required = true)]
    pub tags: Vec<String>,
}

/// Arguments for `node tag delete`.
#[derive(Debug, Args)]
pub struct TagDeleteArgs {
    /// Node identifier.
    #[arg(required = true)]
    pub id: String,

    /// Tag key to remove.
    #[arg(required = true)]
    pub key: String,
}
