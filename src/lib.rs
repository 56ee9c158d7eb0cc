//! Command-line client for the automation and arc agent services.
//!
//! `lyra` authenticates against an identity service, discovers the
//! automation and arc endpoints from the service catalogue, and drives both
//! REST APIs: automations and their runs on one side, jobs and nodes on the
//! other. Runs can be followed until every dispatched job reaches a terminal
//! status.
//!
//! # Modules
//!
//! - [`config`]: Layered configuration (CLI > env > file > defaults) and CLI definitions
//! - [`auth`]: Credential resolution and token issuance
//! - [`rest`]: Service registry, HTTP transport, retries and pagination
//! - [`client`]: Typed operations on automations, runs, jobs and nodes
//! - [`watch`]: Polling a run until it completes or fails
//! - [`output`]: Table and JSON rendering
//! - [`api`]: Command orchestration used by the binary
//! - [`error`]: Semantic error types for the application

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod rest;
pub mod watch;
