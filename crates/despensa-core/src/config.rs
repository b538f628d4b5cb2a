use crate::app_config::{AppConfig, ProductErrorPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
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

    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.is_empty());
    let log_level = or_default("DESPENSA_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("DESPENSA_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("DESPENSA_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("DESPENSA_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("DESPENSA_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "DESPENSA_SCRAPER_USER_AGENT",
        "despensa/0.1 (catalog-scraper)",
    );
    let scraper_inter_request_delay_ms =
        parse_u64("DESPENSA_SCRAPER_INTER_REQUEST_DELAY_MS", "0")?;

    let product_error_policy = or_default("DESPENSA_PRODUCT_ERROR_POLICY", "abort")
        .parse::<ProductErrorPolicy>()
        .map_err(|e| invalid("DESPENSA_PRODUCT_ERROR_POLICY", e.to_string()))?;

    let mercadona_base_url = or_default(
        "DESPENSA_MERCADONA_BASE_URL",
        "https://tienda.mercadona.es/api",
    );
    let mercadona_lang = or_default("DESPENSA_MERCADONA_LANG", "es");
    let mercadona_warehouse = or_default("DESPENSA_MERCADONA_WAREHOUSE", "vlc1");
    let consum_base_url = or_default(
        "DESPENSA_CONSUM_BASE_URL",
        "https://tienda.consum.es/api/rest/V1.0",
    );
    let consum_page_limit = parse_u32("DESPENSA_CONSUM_PAGE_LIMIT", "999999")?;
    if consum_page_limit == 0 {
        return Err(invalid(
            "DESPENSA_CONSUM_PAGE_LIMIT",
            "must be greater than zero".to_string(),
        ));
    }

    let emergency_csv_path = PathBuf::from(or_default(
        "DESPENSA_EMERGENCY_CSV_PATH",
        "emergency_save.csv",
    ));

    Ok(AppConfig {
        database_url,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_inter_request_delay_ms,
        product_error_policy,
        mercadona_base_url,
        mercadona_lang,
        mercadona_warehouse,
        consum_base_url,
        consum_page_limit,
        emergency_csv_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
