use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
///
/// Every variable has a default, so the only failure mode is a present but
/// unparseable value.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values count as unset, so `LIMIT=` behaves like no limit at all.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let db_host = or_default("DB_HOST", "mysql");
    let db_user = or_default("FEEDGEN_DB_USER", "root");
    let db_password = or_default("DB_PASSWORD", "");
    let db_name = or_default("FEEDGEN_DB_NAME", "magentodb");

    let base_url = or_default("BASE_URL", "https://shop.example.com")
        .trim_end_matches('/')
        .to_string();

    let output_dir = PathBuf::from(or_default("FEEDGEN_OUTPUT_DIR", "./output"));
    let output_file = optional("FEEDGEN_OUTPUT_FILE").map(PathBuf::from);

    let row_limit = optional("LIMIT")
        .map(|raw| {
            raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
                var: "LIMIT".to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()?;

    let db_max_retries = parse_u32("FEEDGEN_DB_MAX_RETRIES", "30")?;
    let db_retry_backoff_base_secs = parse_u64("FEEDGEN_DB_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        db_host,
        db_user,
        db_password,
        db_name,
        base_url,
        output_dir,
        output_file,
        row_limit,
        db_max_retries,
        db_retry_backoff_base_secs,
    })
}
