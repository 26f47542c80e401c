use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables fall back to their defaults.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let log_level = or_default("PAGESENSE_LOG_LEVEL", "info");
    let database_path = PathBuf::from(or_default("PAGESENSE_DATABASE_PATH", "data/analysis.db"));

    let db_max_connections: u32 = parse_as(
        "PAGESENSE_DB_MAX_CONNECTIONS",
        &or_default("PAGESENSE_DB_MAX_CONNECTIONS", "5"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_as(
        "PAGESENSE_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("PAGESENSE_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let fetch_timeout_secs: u64 = parse_as(
        "PAGESENSE_FETCH_TIMEOUT_SECS",
        &or_default("PAGESENSE_FETCH_TIMEOUT_SECS", "10"),
    )?;
    let user_agent = or_default("PAGESENSE_USER_AGENT", "pagesense/0.1 (content-analysis)");
    let content_max_chars: usize = parse_as(
        "PAGESENSE_CONTENT_MAX_CHARS",
        &or_default("PAGESENSE_CONTENT_MAX_CHARS", "5000"),
    )?;
    let batch_delay_ms: u64 = parse_as(
        "PAGESENSE_BATCH_DELAY_MS",
        &or_default("PAGESENSE_BATCH_DELAY_MS", "1000"),
    )?;

    if db_max_connections == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PAGESENSE_DB_MAX_CONNECTIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if fetch_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PAGESENSE_FETCH_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        database_path,
        db_max_connections,
        db_acquire_timeout_secs,
        fetch_timeout_secs,
        user_agent,
        content_max_chars,
        batch_delay_ms,
    })
}

/// Parse a raw env-var value, tagging failures with the variable name.
fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;
    use std::path::PathBuf;
    use std::time::Duration;

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
    fn build_app_config_uses_defaults_for_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.database_path, PathBuf::from("data/analysis.db"));
        assert_eq!(cfg.db_max_connections, 5);
        assert_eq!(cfg.db_acquire_timeout_secs, 10);
        assert_eq!(cfg.fetch_timeout_secs, 10);
        assert_eq!(cfg.user_agent, "pagesense/0.1 (content-analysis)");
        assert_eq!(cfg.content_max_chars, 5000);
        assert_eq!(cfg.batch_delay_ms, 1000);
    }

    #[test]
    fn duration_helpers_convert_units() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.batch_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn database_path_override() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_DATABASE_PATH", "/tmp/pagesense/test.db");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/pagesense/test.db"));
    }

    #[test]
    fn user_agent_override() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }

    #[test]
    fn batch_delay_override() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_BATCH_DELAY_MS", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.batch_delay_ms, 0);
        assert_eq!(cfg.batch_delay(), Duration::ZERO);
    }

    #[test]
    fn batch_delay_invalid() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_BATCH_DELAY_MS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGESENSE_BATCH_DELAY_MS"),
            "expected InvalidEnvVar(PAGESENSE_BATCH_DELAY_MS), got: {result:?}"
        );
    }

    #[test]
    fn fetch_timeout_override() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_FETCH_TIMEOUT_SECS", "30");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 30);
    }

    #[test]
    fn fetch_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_FETCH_TIMEOUT_SECS", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGESENSE_FETCH_TIMEOUT_SECS"),
            "expected InvalidEnvVar(PAGESENSE_FETCH_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn fetch_timeout_zero_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_FETCH_TIMEOUT_SECS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGESENSE_FETCH_TIMEOUT_SECS"),
            "expected InvalidEnvVar(PAGESENSE_FETCH_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn content_max_chars_invalid() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_CONTENT_MAX_CHARS", "lots");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGESENSE_CONTENT_MAX_CHARS"),
            "expected InvalidEnvVar(PAGESENSE_CONTENT_MAX_CHARS), got: {result:?}"
        );
    }

    #[test]
    fn zero_max_connections_rejected() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_DB_MAX_CONNECTIONS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAGESENSE_DB_MAX_CONNECTIONS"),
            "expected InvalidEnvVar(PAGESENSE_DB_MAX_CONNECTIONS), got: {result:?}"
        );
    }

    #[test]
    fn whitespace_around_numbers_is_tolerated() {
        let mut map = HashMap::new();
        map.insert("PAGESENSE_DB_ACQUIRE_TIMEOUT_SECS", " 7 ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.db_acquire_timeout_secs, 7);
    }
}
