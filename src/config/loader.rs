//! Configuration loading with layered precedence.
//!
//! This module loads configuration with the precedence order (lowest to
//! highest): application defaults, configuration file, environment variables,
//! command-line arguments.
//!
//! The layers are composed by hand with `MergeComposer` rather than through
//! `OrthoConfig::load()` because the `Cli` struct owns subcommand dispatch,
//! and because typed environment variables must fail fast instead of being
//! silently ignored.
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g., `LYRA_HTTP_DEBUG=maybe`
//! instead of `true`/`false`) return an error immediately. String fields
//! (e.g., `LYRA_TOKEN`) are always accepted.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `LYRA_TOKEN`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["retry", "max_attempts"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

const fn string_var(env_var: &'static str, path: &'static [&'static str]) -> EnvVarSpec {
    EnvVarSpec {
        env_var,
        path,
        var_type: EnvVarType::String,
    }
}

const fn u64_var(env_var: &'static str, path: &'static [&'static str]) -> EnvVarSpec {
    EnvVarSpec {
        env_var,
        path,
        var_type: EnvVarType::U64,
    }
}

/// Table of all environment variables and their JSON paths.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    string_var("LYRA_TOKEN", &["token"]),
    string_var("LYRA_AUTOMATION_ENDPOINT", &["automation_endpoint"]),
    string_var("LYRA_ARC_ENDPOINT", &["arc_endpoint"]),
    // Identity
    string_var("LYRA_AUTH_URL", &["auth", "auth_url"]),
    string_var("LYRA_USER_ID", &["auth", "user_id"]),
    string_var("LYRA_USERNAME", &["auth", "username"]),
    string_var("LYRA_PASSWORD", &["auth", "password"]),
    string_var("LYRA_USER_DOMAIN_ID", &["auth", "user_domain_id"]),
    string_var("LYRA_USER_DOMAIN_NAME", &["auth", "user_domain_name"]),
    string_var("LYRA_PROJECT_ID", &["auth", "project_id"]),
    string_var("LYRA_PROJECT_NAME", &["auth", "project_name"]),
    string_var("LYRA_PROJECT_DOMAIN_ID", &["auth", "project_domain_id"]),
    string_var("LYRA_PROJECT_DOMAIN_NAME", &["auth", "project_domain_name"]),
    string_var(
        "LYRA_APPLICATION_CREDENTIAL_ID",
        &["auth", "application_credential_id"],
    ),
    string_var(
        "LYRA_APPLICATION_CREDENTIAL_NAME",
        &["auth", "application_credential_name"],
    ),
    string_var(
        "LYRA_APPLICATION_CREDENTIAL_SECRET",
        &["auth", "application_credential_secret"],
    ),
    string_var("LYRA_REGION", &["auth", "region"]),
    // Retry
    u64_var("LYRA_RETRY_MAX_ATTEMPTS", &["retry", "max_attempts"]),
    u64_var("LYRA_RETRY_INITIAL_BACKOFF_MS", &["retry", "initial_backoff_ms"]),
    u64_var("LYRA_RETRY_MAX_BACKOFF_MS", &["retry", "max_backoff_ms"]),
    // Watch
    u64_var("LYRA_WATCH_INTERVAL_SECS", &["watch", "interval_secs"]),
    u64_var("LYRA_WATCH_TIMEOUT_SECS", &["watch", "timeout_secs"]),
    // Pagination
    string_var(
        "LYRA_PAGINATION_AUTOMATION_PAGES_HEADER",
        &["pagination", "automation_pages_header"],
    ),
    string_var(
        "LYRA_PAGINATION_ARC_PAGES_HEADER",
        &["pagination", "arc_pages_header"],
    ),
    // HTTP
    EnvVarSpec {
        env_var: "LYRA_HTTP_DEBUG",
        path: &["http", "debug"],
        var_type: EnvVarType::Bool,
    },
    u64_var("LYRA_HTTP_TIMEOUT_SECS", &["http", "timeout_secs"]),
    // Output
    string_var("LYRA_OUTPUT_FORMAT", &["output", "format"]),
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `LYRA_*` variable without keeping a second
/// hard-coded list in sync.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence.
///
/// 1. Application defaults defined in the struct
/// 2. Configuration file (`--config`, or discovered via `LYRA_CONFIG_PATH`
///    and XDG paths)
/// 3. Environment variables prefixed with `LYRA_`
/// 4. Command-line arguments (from the provided `Cli`)
///
/// # Errors
///
/// Returns `ConfigError` if the configuration file named by `--config` does
/// not exist, a file cannot be parsed, a typed environment variable has an
/// invalid value, or the merged layers do not deserialise.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path = match cli.config.clone() {
        Some(path) if path.exists() => Some(path),
        Some(path) => {
            return Err(ConfigError::FileNotFound {
                path: path.into_std_path_buf(),
            }
            .into());
        }
        None => discover_config_file(),
    };

    if let Some(ref path) = config_path {
        tracing::debug!(path = %path, "loading configuration file");
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars()?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

/// Find the first existing configuration file among the discovery candidates.
fn discover_config_file() -> Option<Utf8PathBuf> {
    let discovery = ConfigDiscovery::builder("lyra")
        .env_var("LYRA_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".lyra.toml")
        .build();
    discovery
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok())
}

/// Collect environment variables with the `LYRA_` prefix into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed environment variable (bool, u64)
/// has an unparseable value.
fn collect_env_vars() -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Ok(raw_value) = std::env::var(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::U64 => match raw_value.parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map, creating intermediate
/// objects as needed.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    let top_level = [
        ("token", cli.token.as_ref()),
        ("automation_endpoint", cli.automation_endpoint.as_ref()),
        ("arc_endpoint", cli.arc_endpoint.as_ref()),
    ];
    for (key, value) in top_level {
        if let Some(text) = value {
            overrides.insert(key.to_owned(), Value::String(text.clone()));
        }
    }

    if let Some(format) = cli.format {
        insert_at_path(
            &mut overrides,
            &["output", "format"],
            Value::String(format.as_str().to_owned()),
        );
    }

    // `--debug` can only switch the dump on; absence leaves lower layers alone.
    if cli.debug {
        insert_at_path(&mut overrides, &["http", "debug"], Value::Bool(true));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
