use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or internally inconsistent.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or internally inconsistent.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup, with no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("INSTASCRAPE_ENV", "development"));
    let log_level = or_default("INSTASCRAPE_LOG_LEVEL", "info");
    let profiles_path = PathBuf::from(or_default(
        "INSTASCRAPE_PROFILES_PATH",
        "./config/profiles.yaml",
    ));
    let base_url = or_default("INSTASCRAPE_BASE_URL", "https://www.instagram.com");

    let request_timeout_secs = parse_u64("INSTASCRAPE_REQUEST_TIMEOUT_SECS", "15")?;
    let min_delay_ms = parse_u64("INSTASCRAPE_MIN_DELAY_MS", "2000")?;
    let max_delay_ms = parse_u64("INSTASCRAPE_MAX_DELAY_MS", "5000")?;
    let batch_min_delay_ms = parse_u64("INSTASCRAPE_BATCH_MIN_DELAY_MS", "3000")?;
    let batch_max_delay_ms = parse_u64("INSTASCRAPE_BATCH_MAX_DELAY_MS", "8000")?;
    let block_backoff_secs = parse_u64("INSTASCRAPE_BLOCK_BACKOFF_SECS", "10")?;
    let max_batch_size = parse_usize("INSTASCRAPE_MAX_BATCH_SIZE", "20")?;

    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCRAPE_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }
    if min_delay_ms > max_delay_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCRAPE_MIN_DELAY_MS".to_string(),
            reason: format!("min delay {min_delay_ms}ms exceeds max delay {max_delay_ms}ms"),
        });
    }
    if batch_min_delay_ms > batch_max_delay_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSTASCRAPE_BATCH_MIN_DELAY_MS".to_string(),
            reason: format!(
                "batch min delay {batch_min_delay_ms}ms exceeds max delay {batch_max_delay_ms}ms"
            ),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        profiles_path,
        base_url,
        request_timeout_secs,
        min_delay_ms,
        max_delay_ms,
        batch_min_delay_ms,
        batch_max_delay_ms,
        block_backoff_secs,
        max_batch_size,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
