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

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("CLINICDIR_API_BASE_URL", "https://api.clinics.test/v1");
    m
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
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CLINICDIR_ENV"));
}

#[test]
fn build_app_config_fails_without_api_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "CLINICDIR_API_BASE_URL"),
        "expected MissingEnvVar(CLINICDIR_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_base_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("CLINICDIR_API_BASE_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("CLINICDIR_API_BASE_URL", "ftp://clinics.test");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLINICDIR_API_BASE_URL"),
        "expected InvalidEnvVar(CLINICDIR_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("CLINICDIR_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLINICDIR_BIND_ADDR"),
        "expected InvalidEnvVar(CLINICDIR_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.api_base_url, "https://api.clinics.test/v1");
    assert!(cfg.api_token.is_none());
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "clinicdir/0.1 (admin-review)");
    assert!(cfg.submitter_key.is_none());
    assert_eq!(cfg.deleted_page_size, 50);
    assert_eq!(cfg.deleted_max_pages, 20);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("CLINICDIR_API_TOKEN", "admin-token");
    map.insert("CLINICDIR_ENV", "production");
    map.insert("CLINICDIR_REQUEST_TIMEOUT_SECS", "5");
    map.insert("CLINICDIR_SUBMITTER_KEY", "moderator-7");
    map.insert("CLINICDIR_DELETED_PAGE_SIZE", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_token.as_deref(), Some("admin-token"));
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.submitter_key.as_deref(), Some("moderator-7"));
    assert_eq!(cfg.deleted_page_size, 10);
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = full_env();
    map.insert("CLINICDIR_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLINICDIR_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CLINICDIR_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_page_size() {
    let mut map = full_env();
    map.insert("CLINICDIR_DELETED_PAGE_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CLINICDIR_DELETED_PAGE_SIZE")
    );
}

#[test]
fn debug_redacts_secrets() {
    let mut map = full_env();
    map.insert("CLINICDIR_API_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
