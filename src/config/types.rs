//! Configuration data types for lyra.

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Default total-pages header used by both backends.
pub const DEFAULT_PAGES_HEADER: &str = "Pagination-Pages";

/// Identity service credentials and scope.
///
/// Every field is optional here; which combination is required depends on
/// the authentication method and is checked when credentials are resolved.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Identity service URL, for example `https://identity.example.com/v3`.
    pub auth_url: Option<String>,
    /// User ID.
    pub user_id: Option<String>,
    /// User name (requires a user domain).
    pub username: Option<String>,
    /// User password.
    pub password: Option<String>,
    /// Domain ID of the user.
    pub user_domain_id: Option<String>,
    /// Domain name of the user.
    pub user_domain_name: Option<String>,
    /// Project ID to scope the token to.
    pub project_id: Option<String>,
    /// Project name to scope the token to (requires a project domain).
    pub project_name: Option<String>,
    /// Domain ID of the project.
    pub project_domain_id: Option<String>,
    /// Domain name of the project.
    pub project_domain_name: Option<String>,
    /// Application credential ID.
    pub application_credential_id: Option<String>,
    /// Application credential name (requires a user).
    pub application_credential_name: Option<String>,
    /// Application credential secret.
    pub application_credential_secret: Option<String>,
    /// Region used to pick catalogue endpoints.
    pub region: Option<String>,
}

/// Retry behaviour for individual REST calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound for the doubling delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
        }
    }
}

/// Run watch timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Seconds between polls.
    pub interval_secs: u64,
    /// Wall-clock ceiling for a watch in seconds; `0` disables it.
    pub timeout_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            timeout_secs: 3_600,
        }
    }
}

/// Names of the total-pages response header per backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Header carrying the page count on automation service lists.
    pub automation_pages_header: String,
    /// Header carrying the page count on arc service lists.
    pub arc_pages_header: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            automation_pages_header: String::from(DEFAULT_PAGES_HEADER),
            arc_pages_header: String::from(DEFAULT_PAGES_HEADER),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Dump every request and response to the diagnostic log.
    pub debug: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            debug: false,
            timeout_secs: 60,
        }
    }
}

/// Output rendering settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used for command results.
    pub format: OutputFormat,
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `LYRA_CONFIG_PATH` environment variable
/// 2. `.lyra.toml` in the current working directory
/// 3. `.lyra.toml` in the home directory
/// 4. `~/.config/lyra/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "LYRA",
    post_merge_hook,
    discovery(
        app_name = "lyra",
        env_var = "LYRA_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".lyra.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// A previously issued token; skips authentication when the endpoints
    /// are also known.
    pub token: Option<String>,

    /// Base URL of the automation service.
    pub automation_endpoint: Option<String>,

    /// Base URL of the arc (agent/node) service.
    pub arc_endpoint: Option<String>,

    /// Identity service configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub auth: AuthConfig,

    /// Retry configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub retry: RetryConfig,

    /// Run watch configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub watch: WatchConfig,

    /// Pagination header configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub pagination: PaginationConfig,

    /// HTTP client configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub http: HttpConfig,

    /// Output configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Returns the token and both endpoints when all three are configured.
    ///
    /// Empty strings count as absent. When this returns `None` the caller has
    /// to authenticate against the identity service.
    #[must_use]
    pub fn cached_session(&self) -> Option<(&str, &str, &str)> {
        let token = non_empty(self.token.as_deref())?;
        let automation = non_empty(self.automation_endpoint.as_deref())?;
        let arc = non_empty(self.arc_endpoint.as_deref())?;
        Some((token, automation, arc))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Endpoints are joined with relative paths later; a trailing slash
        // would produce `//api/...`.
        for endpoint in [&mut self.automation_endpoint, &mut self.arc_endpoint] {
            if let Some(url) = endpoint.as_mut() {
                let trimmed_len = url.trim_end_matches('/').len();
                url.truncate(trimmed_len);
            }
        }
        Ok(())
    }
}
