use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "STOREMAP_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.api_url, "http://127.0.0.1:5000");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "storemap/0.1 (store-locator)");
    assert_eq!(cfg.max_attempts, 3);
    assert_eq!(cfg.retry_delay_ms, 1000);
    assert_eq!(cfg.search_debounce_ms, 300);
    assert_eq!(cfg.search_debounce().as_millis(), 300);
    assert!(cfg.admin_username.is_none());
    assert!(cfg.admin_password.is_none());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("STOREMAP_API_URL", "https://stores.example.com");
    map.insert("STOREMAP_ENV", "production");
    map.insert("STOREMAP_MAX_ATTEMPTS", "5");
    map.insert("STOREMAP_RETRY_DELAY_MS", "250");
    map.insert("STOREMAP_SEARCH_DEBOUNCE_MS", "150");
    map.insert("STOREMAP_ADMIN_USERNAME", "admin");
    map.insert("STOREMAP_ADMIN_PASSWORD", "hunter2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_url, "https://stores.example.com");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.max_attempts, 5);
    assert_eq!(cfg.retry_delay_ms, 250);
    assert_eq!(cfg.search_debounce_ms, 150);
    assert_eq!(cfg.admin_username.as_deref(), Some("admin"));
    assert_eq!(cfg.admin_password.as_deref(), Some("hunter2"));
}

#[test]
fn build_app_config_rejects_non_http_api_url() {
    let mut map = HashMap::new();
    map.insert("STOREMAP_API_URL", "ftp://stores.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREMAP_API_URL"),
        "expected InvalidEnvVar(STOREMAP_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_attempts() {
    let mut map = HashMap::new();
    map.insert("STOREMAP_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREMAP_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(STOREMAP_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("STOREMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STOREMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn blank_admin_credentials_are_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("STOREMAP_ADMIN_USERNAME", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.admin_username.is_none());
}

#[test]
fn debug_output_redacts_admin_password() {
    let mut map = HashMap::new();
    map.insert("STOREMAP_ADMIN_PASSWORD", "hunter2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
