//! Offline unit tests for despensa-db pool configuration and row types.
//! These tests do not require a live database connection.

use despensa_core::{AppConfig, ProductErrorPolicy};
use despensa_db::{PoolConfig, ProductRow, ScrapeRunRow};
use rust_decimal::Decimal;
use std::path::PathBuf;

fn app_config(database_url: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: database_url.map(str::to_string),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_inter_request_delay_ms: 0,
        product_error_policy: ProductErrorPolicy::Abort,
        mercadona_base_url: "http://localhost/mercadona".to_string(),
        mercadona_lang: "es".to_string(),
        mercadona_warehouse: "vlc1".to_string(),
        consum_base_url: "http://localhost/consum".to_string(),
        consum_page_limit: 999_999,
        emergency_csv_path: PathBuf::from("emergency_save.csv"),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config(Some("postgres://example")));

    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn connect_without_database_url_is_missing_database_url() {
    let result = despensa_db::connect_pool_from_config(&app_config(None)).await;

    assert!(
        matches!(result, Err(despensa_db::DbError::MissingDatabaseUrl)),
        "expected MissingDatabaseUrl, got: {result:?}"
    );
}

/// Compile-time smoke test: confirm that [`ScrapeRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn scrape_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = ScrapeRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        vendor: "Consum".to_string(),
        trigger_source: "cli".to_string(),
        status: "queued".to_string(),
        started_at: None,
        completed_at: None,
        records_processed: 0_i32,
        error_message: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.vendor, "Consum");
    assert_eq!(row.status, "queued");
    assert!(row.started_at.is_none());
    assert_eq!(row.records_processed, 0);
}

/// Compile-time smoke test for [`ProductRow`].
#[test]
fn product_row_has_expected_fields() {
    use chrono::Utc;

    let row = ProductRow {
        id: 42_i64,
        external_id: "4241".to_string(),
        name: "Aceite de oliva virgen extra".to_string(),
        brand: None,
        image_url: String::new(),
        size: Some(Decimal::new(5000, 3)),
        is_approx_size: false,
        size_format: Some("l".to_string()),
        price: Decimal::new(347_500, 4),
        price_per_size: Decimal::new(69_500, 4),
        is_pack: false,
        total_units: None,
        packaging: Some("Garrafa".to_string()),
        unit_name: None,
        department: None,
        category: "Aceite, especias y salsas".to_string(),
        subcategory: "Aceite, vinagre y sal".to_string(),
        subtype: "Aceite de oliva".to_string(),
        vendor: "Mercadona".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.external_id, "4241");
    assert_eq!(row.price, Decimal::new(3475, 2));
    assert!(row.total_units.is_none());
}
