use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|v| !v.is_empty());
    let env = parse_environment(&or_default("KINEWS_ENV", "development"))?;
    let log_level = or_default("KINEWS_LOG_LEVEL", "info");
    let feeds_path = PathBuf::from(or_default("KINEWS_FEEDS_PATH", "./config/feeds.yaml"));

    let db_max_connections = parse_u32("KINEWS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("KINEWS_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "KINEWS_DB_MIN_CONNECTIONS",
            format!(
                "{db_min_connections} exceeds KINEWS_DB_MAX_CONNECTIONS ({db_max_connections})"
            ),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("KINEWS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let feed_timeout_secs = parse_u64("KINEWS_FEED_TIMEOUT_SECS", "10")?;
    let feed_user_agent = or_default("KINEWS_FEED_USER_AGENT", "kinews/0.1 (newsletter-curation)");

    let llm_api_url = or_default("KINEWS_LLM_API_URL", "https://api.openai.com/v1");
    let llm_api_key = lookup("KINEWS_LLM_API_KEY").ok().filter(|v| !v.is_empty());
    let llm_model = or_default("KINEWS_LLM_MODEL", "gpt-4o-mini");
    let llm_temperature = parse_temperature(&or_default("KINEWS_LLM_TEMPERATURE", "0.7"))?;
    let llm_max_tokens = parse_u32("KINEWS_LLM_MAX_TOKENS", "4000")?;
    let llm_timeout_secs = parse_u64("KINEWS_LLM_TIMEOUT_SECS", "120")?;

    let promo_link = lookup("KINEWS_PROMO_LINK").ok().filter(|v| !v.trim().is_empty());
    let top_n = parse_usize("KINEWS_TOP_N", "10")?;
    if top_n == 0 {
        return Err(invalid("KINEWS_TOP_N", "must be at least 1".to_string()));
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        feeds_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        feed_timeout_secs,
        feed_user_agent,
        llm_api_url,
        llm_api_key,
        llm_model,
        llm_temperature,
        llm_max_tokens,
        llm_timeout_secs,
        promo_link,
        top_n,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "KINEWS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Sampling temperature must be a finite value in `[0.0, 2.0]`.
fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "KINEWS_LLM_TEMPERATURE".to_string(),
        reason,
    };
    let value = raw.parse::<f32>().map_err(|e| invalid(e.to_string()))?;
    if !value.is_finite() || !(0.0..=2.0).contains(&value) {
        return Err(invalid(format!("{value} is outside 0.0..=2.0")));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
