use std::path::PathBuf;
use std::str::FromStr;

use crate::CoreError;

/// What the catalog walk does when a single product fails to normalize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductErrorPolicy {
    /// Propagate the error and discard the whole walk.
    #[default]
    Abort,
    /// Log the product, count it as skipped, and keep walking.
    Skip,
}

impl std::fmt::Display for ProductErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductErrorPolicy::Abort => write!(f, "abort"),
            ProductErrorPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for ProductErrorPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(ProductErrorPolicy::Abort),
            "skip" => Ok(ProductErrorPolicy::Skip),
            _ => Err(CoreError::UnknownErrorPolicy(s.to_owned())),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// `None` leaves the database sink unconfigured; scrapes then land in
    /// the emergency CSV.
    pub database_url: Option<String>,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_request_delay_ms: u64,
    pub product_error_policy: ProductErrorPolicy,
    pub mercadona_base_url: String,
    pub mercadona_lang: String,
    pub mercadona_warehouse: String,
    pub consum_base_url: String,
    pub consum_page_limit: u32,
    pub emergency_csv_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_request_delay_ms",
                &self.scraper_inter_request_delay_ms,
            )
            .field("product_error_policy", &self.product_error_policy)
            .field("mercadona_base_url", &self.mercadona_base_url)
            .field("mercadona_lang", &self.mercadona_lang)
            .field("mercadona_warehouse", &self.mercadona_warehouse)
            .field("consum_base_url", &self.consum_base_url)
            .field("consum_page_limit", &self.consum_page_limit)
            .field("emergency_csv_path", &self.emergency_csv_path)
            .finish()
    }
}
