//! Configuration system for lyra.
//!
//! This module provides the configuration structures and CLI definitions for
//! the lyra client. Configuration loading and precedence merging is handled by
//! the `ortho_config` crate: CLI flags override environment variables, which
//! override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/lyra/config.toml` by default.
//!
//! # Example Configuration
//!
//! ```toml
//! automation_endpoint = "https://automation.example.com"
//! arc_endpoint = "https://arc.example.com"
//!
//! [auth]
//! auth_url = "https://identity.example.com/v3"
//! username = "operator"
//! user_domain_name = "Default"
//! project_name = "fleet"
//! project_domain_name = "Default"
//!
//! [retry]
//! max_attempts = 3
//! initial_backoff_ms = 500
//! max_backoff_ms = 8000
//!
//! [watch]
//! interval_secs = 5
//! timeout_secs = 3600
//!
//! [pagination]
//! automation_pages_header = "Pagination-Pages"
//! arc_pages_header = "Pagination-Pages"
//!
//! [output]
//! format = "table"
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{
    AutomationCommand, ChefAutomationArgs, Cli, Commands, CreateAutomationCommand, ExecuteArgs,
    IdArgs, JobCommand, NodeCommand, NodeListArgs, RunCommand, ScriptAutomationArgs, TagAddArgs,
    TagCommand, TagDeleteArgs,
};
pub use loader::{env_var_names, load_config};
pub use types::{
    AppConfig, AuthConfig, DEFAULT_PAGES_HEADER, HttpConfig, OutputConfig, PaginationConfig,
    RetryConfig, WatchConfig,
};
