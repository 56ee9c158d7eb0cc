//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::{AppConfig, DEFAULT_PAGES_HEADER};
use crate::output::OutputFormat;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        token = "gAAAAABcached"
        automation_endpoint = "https://automation.example.com"
        arc_endpoint = "https://arc.example.com"

        [auth]
        auth_url = "https://identity.example.com/v3"
        username = "operator"
        user_domain_name = "Default"
        project_name = "fleet"
        project_domain_name = "Default"
        region = "eu-de-1"

        [retry]
        max_attempts = 5
        initial_backoff_ms = 100
        max_backoff_ms = 1000

        [watch]
        interval_secs = 2
        timeout_secs = 0

        [pagination]
        automation_pages_header = "X-Total-Pages"

        [http]
        debug = true

        [output]
        format = "json"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        arc_endpoint = "https://arc.example.com"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(config.token.is_none(), "token should be None");
    assert!(
        config.automation_endpoint.is_none(),
        "automation_endpoint should be None"
    );
    assert!(config.arc_endpoint.is_none(), "arc_endpoint should be None");
    assert!(config.auth.auth_url.is_none(), "auth.auth_url should be None");
    assert_eq!(config.retry.max_attempts, 3, "retry.max_attempts should be 3");
    assert_eq!(
        config.watch.interval_secs, 5,
        "watch.interval_secs should be 5"
    );
    assert_eq!(
        config.watch.timeout_secs, 3_600,
        "watch.timeout_secs should be 3600"
    );
    assert_eq!(
        config.pagination.automation_pages_header, DEFAULT_PAGES_HEADER,
        "automation pages header should be the default"
    );
    assert_eq!(
        config.pagination.arc_pages_header, DEFAULT_PAGES_HEADER,
        "arc pages header should be the default"
    );
    assert!(!config.http.debug, "http.debug should be false");
    assert_eq!(
        config.output.format,
        OutputFormat::Table,
        "output.format should be table"
    );
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for
/// testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "automation_endpoint": "https://file.automation",
            "arc_endpoint": "https://file.arc"
        }),
        None,
    );

    composer.push_environment(json!({
        "automation_endpoint": "https://env.automation"
    }));

    Ok(composer)
}
