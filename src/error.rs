//! Semantic error types for the lyra client.
//!
//! This module defines the error hierarchy for lyra, following the principle of
//! using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect, retry, or map to an exit code, while reserving opaque errors
//! (`eyre::Report`) for the application boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while obtaining a token from the identity service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Not enough credentials were supplied to attempt authentication.
    #[error("missing credentials: {field}")]
    MissingCredentials {
        /// The credential fields that are absent.
        field: String,
    },

    /// The identity service rejected the request or could not be reached.
    #[error("authentication failed: {message}")]
    AuthenticationFailed {
        /// A description of the failure.
        message: String,
    },

    /// The service catalogue does not advertise a required service.
    #[error("no '{service}' endpoint found in the service catalogue")]
    EndpointNotFound {
        /// The service type that was looked up.
        service: String,
    },
}

/// Errors produced by REST calls against the backend services.
#[derive(Debug, Error)]
pub enum RestError {
    /// The request never produced an HTTP response (connection, DNS, TLS or
    /// timeout failure).
    #[error("request to {url} failed: {message}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A description of the transport failure.
        message: String,
    },

    /// The backend answered with a status the caller treats as fatal.
    #[error("request failed with HTTP status {code}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        code: u16,
        /// The response body, as returned by the backend.
        body: String,
    },

    /// A response body was not the JSON shape the caller required.
    #[error("failed to decode response: {message}")]
    Decode {
        /// A description of the decoding failure.
        message: String,
    },

    /// A request named a service that was never registered.
    #[error("service '{service}' is not registered")]
    UnknownService {
        /// The service name.
        service: String,
    },

    /// A service endpoint or request path could not form a valid URL.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// The parser's complaint.
        message: String,
    },
}

impl RestError {
    /// Returns whether a retry could plausibly succeed.
    ///
    /// Transport failures and 5xx statuses are retryable; everything else is
    /// a caller or programming error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::HttpStatus { code, .. } => *code >= 500,
            Self::Decode { .. } | Self::UnknownService { .. } | Self::InvalidUrl { .. } => false,
        }
    }
}

/// Errors detected before any network call is attempted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required identifier or selector was empty.
    #[error("missing required argument: {field}")]
    MissingArgument {
        /// The name of the missing argument.
        field: String,
    },

    /// An argument was present but malformed.
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument {
        /// The name of the invalid argument.
        field: String,
        /// The reason it was rejected.
        reason: String,
    },
}

/// Errors that end a run watch without a terminal outcome.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The watch was cancelled before the run finished.
    #[error("watch of run '{run_id}' was cancelled")]
    Cancelled {
        /// The run being watched.
        run_id: String,
    },

    /// The run did not finish within the configured ceiling.
    #[error("watch of run '{run_id}' timed out after {seconds} seconds")]
    TimedOut {
        /// The run being watched.
        run_id: String,
        /// The configured ceiling in seconds.
        seconds: u64,
    },
}

/// Errors raised while rendering or writing command output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The value could not be rendered in the requested format.
    #[error("failed to render output: {message}")]
    Render {
        /// A description of the rendering failure.
        message: String,
    },

    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for the lyra client.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the library. At the application boundary (main.rs),
/// these errors are converted to `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum LyraError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred during authentication.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A REST call failed.
    #[error(transparent)]
    Rest(#[from] RestError),

    /// A command was rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A run watch ended without a terminal outcome.
    #[error(transparent)]
    Watch(#[from] WatchError),

    /// Command output could not be produced.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// The command was interrupted before it finished.
    #[error("interrupted before the command finished")]
    Interrupted,
}

/// A specialised `Result` type for lyra operations.
pub type Result<T> = std::result::Result<T, LyraError>;

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Report;
    use rstest::{fixture, rstest};

    /// Fixture providing a sample configuration file path.
    #[fixture]
    fn config_path() -> PathBuf {
        PathBuf::from("/etc/lyra/config.toml")
    }

    /// Fixture providing a sample run identifier.
    #[fixture]
    fn run_id() -> String {
        String::from("42")
    }

    #[rstest]
    fn config_error_file_not_found_displays_correctly(config_path: PathBuf) {
        let error = ConfigError::FileNotFound { path: config_path };
        assert_eq!(
            error.to_string(),
            "configuration file not found: /etc/lyra/config.toml"
        );
    }

    #[rstest]
    #[case(
        "retry.max_attempts",
        "must be a positive integer",
        "invalid configuration value for 'retry.max_attempts': must be a positive integer"
    )]
    #[case(
        "output.format",
        "unknown format",
        "invalid configuration value for 'output.format': unknown format"
    )]
    fn config_error_invalid_value_displays_correctly(
        #[case] field: &str,
        #[case] reason: &str,
        #[case] expected: &str,
    ) {
        let error = ConfigError::InvalidValue {
            field: String::from(field),
            reason: String::from(reason),
        };
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn config_error_ortho_config_displays_correctly() {
        let ortho_error = ortho_config::OrthoError::Validation {
            key: String::from("watch.interval_secs"),
            message: String::from("must be a positive integer"),
        };
        let error = ConfigError::OrthoConfig(Arc::new(ortho_error));
        assert_eq!(
            error.to_string(),
            concat!(
                "configuration loading failed: Validation failed for ",
                "'watch.interval_secs': must be a positive integer"
            )
        );
    }

    #[rstest]
    fn auth_error_endpoint_not_found_names_service() {
        let error = AuthError::EndpointNotFound {
            service: String::from("arc"),
        };
        assert_eq!(
            error.to_string(),
            "no 'arc' endpoint found in the service catalogue"
        );
    }

    #[rstest]
    fn rest_error_http_status_includes_code_and_body() {
        let error = RestError::HttpStatus {
            code: 404,
            body: String::from("not found"),
        };
        assert_eq!(
            error.to_string(),
            "request failed with HTTP status 404: not found"
        );
    }

    #[rstest]
    #[case(
        RestError::Transport {
            url: String::from("http://x"),
            message: String::from("reset"),
        },
        true
    )]
    #[case(RestError::HttpStatus { code: 500, body: String::new() }, true)]
    #[case(RestError::HttpStatus { code: 503, body: String::new() }, true)]
    #[case(RestError::HttpStatus { code: 404, body: String::new() }, false)]
    #[case(RestError::HttpStatus { code: 400, body: String::new() }, false)]
    #[case(RestError::Decode { message: String::from("eof") }, false)]
    #[case(RestError::UnknownService { service: String::from("x") }, false)]
    fn rest_error_retryability(#[case] error: RestError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }

    #[rstest]
    fn validation_error_missing_argument_displays_field() {
        let error = ValidationError::MissingArgument {
            field: String::from("selector"),
        };
        assert_eq!(error.to_string(), "missing required argument: selector");
    }

    #[rstest]
    fn watch_error_timed_out_displays_seconds(run_id: String) {
        let error = WatchError::TimedOut {
            run_id,
            seconds: 3600,
        };
        assert_eq!(
            error.to_string(),
            "watch of run '42' timed out after 3600 seconds"
        );
    }

    #[rstest]
    fn lyra_error_wraps_rest_error() {
        let rest_error = RestError::Decode {
            message: String::from("expected array"),
        };
        let lyra_error: LyraError = rest_error.into();
        assert_eq!(
            lyra_error.to_string(),
            "failed to decode response: expected array"
        );
    }

    #[rstest]
    #[case(
        LyraError::from(ConfigError::MissingRequired {
            field: String::from("auth.auth_url"),
        }),
        "missing required configuration: auth.auth_url"
    )]
    #[case(
        LyraError::from(WatchError::Cancelled {
            run_id: String::from("7"),
        }),
        "watch of run '7' was cancelled"
    )]
    #[case(
        LyraError::from(AuthError::AuthenticationFailed {
            message: String::from("HTTP 401"),
        }),
        "authentication failed: HTTP 401"
    )]
    #[case(LyraError::Interrupted, "interrupted before the command finished")]
    fn eyre_report_preserves_error_messages(#[case] error: LyraError, #[case] expected: &str) {
        let report = Report::from(error);
        assert_eq!(report.to_string(), expected);
    }
}
