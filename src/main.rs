//! `lyra` application entry point.
//!
//! This binary drives the automation and arc services from the command line.
//! It uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/lyra/config.toml` or path from `LYRA_CONFIG_PATH`)
//! 3. Environment variables (`LYRA_*`)
//! 4. Command-line arguments

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use eyre::{Report, Result as EyreResult, WrapErr};
use lyra::api::{self, CommandReport};
use lyra::auth::KeystoneClient;
use lyra::config::{AppConfig, Cli, load_config};
use lyra::error::{LyraError, WatchError};
use lyra::watch::StderrReporter;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit code used when the user interrupts a command.
const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Application entry point.
///
/// Loads configuration, installs logging and a Ctrl-C handler, then runs the
/// selected command on a single-threaded runtime.
fn main() -> EyreResult<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;
    init_tracing(config.http.debug);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start the async runtime")?;

    match runtime.block_on(run(&cli, &config)) {
        Ok(report) => {
            print_report(&report, &config)?;
            Ok(ExitCode::from(report.outcome.exit_code()))
        }
        Err(LyraError::Watch(WatchError::Cancelled { run_id })) => {
            tracing::warn!(%run_id, "watch interrupted; the run continues on the server");
            Ok(ExitCode::from(INTERRUPTED_EXIT_CODE))
        }
        Err(LyraError::Interrupted) => {
            tracing::warn!("interrupted before the command finished");
            Ok(ExitCode::from(INTERRUPTED_EXIT_CODE))
        }
        Err(error) => Err(Report::from(error)),
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(debug: bool) {
    let default_directive = if debug { "lyra=debug" } else { "lyra=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report` and exit codes.
async fn run(cli: &Cli, config: &AppConfig) -> lyra::error::Result<CommandReport> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let provider = KeystoneClient::new(Duration::from_secs(config.http.timeout_secs))?;
    let mut reporter = StderrReporter;
    api::execute(
        &cli.command,
        config,
        &mockable::DefaultEnv::new(),
        &provider,
        &cancel,
        &mut reporter,
    )
    .await
}

/// Write the rendered command output to stdout.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_report(report: &CommandReport, config: &AppConfig) -> EyreResult<()> {
    let rendered = report
        .output
        .render(config.output.format)
        .map_err(LyraError::from)?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}
