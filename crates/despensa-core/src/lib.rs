pub mod app_config;
pub mod catalog;
pub mod config;
pub mod products;

pub use app_config::{AppConfig, ProductErrorPolicy};
pub use catalog::{Catalog, CatalogPath, CatalogRecord};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Product, Vendor};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),
    #[error("unknown product error policy: {0}")]
    UnknownErrorPolicy(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
