//! Integration tests for walking the Mercadona catalog end to end.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use despensa_core::Vendor;
use despensa_scraper::{CatalogClient, CatalogWalker, MercadonaSource, ScraperError};

fn test_source(server: &MockServer) -> MercadonaSource {
    let client =
        CatalogClient::new(5, "despensa-test/0.1").expect("failed to build test CatalogClient");
    MercadonaSource::new(client, &server.uri(), "es", "vlc1")
}

fn product_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "display_name": name,
        "packaging": "Botella",
        "thumbnail": format!("https://img.example/{id}.jpg"),
        "price_instructions": {
            "unit_size": 1.0,
            "approx_size": false,
            "size_format": "l",
            "unit_price": "3.85",
            "bulk_price": "3.85",
            "is_pack": false,
            "total_units": null,
            "unit_name": null
        }
    })
}

async fn mount_categories(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/categories/"))
        .and(query_param("lang", "es"))
        .and(query_param("wh", "vlc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "count": 1,
            "results": [{
                "id": 12,
                "name": "Aceite, especias y salsas",
                "categories": [
                    { "id": 112, "name": "Aceite, vinagre y sal" },
                    { "id": 115, "name": "Especias" }
                ]
            }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn walk_fetches_each_subcategory_and_keeps_api_order() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    Mock::given(method("GET"))
        .and(path("/categories/112/"))
        .and(query_param("wh", "vlc1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "id": 112,
            "categories": [
                { "id": 420, "name": "Aceite de oliva", "products": [product_json("4241", "Aceite de oliva virgen extra")] },
                { "id": 421, "name": "Vinagre", "products": [product_json("4300", "Vinagre de vino")] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/categories/115/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "id": 115,
            "categories": [
                { "id": 430, "name": "Pimienta", "products": [product_json("5001", "Pimienta negra molida")] }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = test_source(&server);
    let outcome = CatalogWalker::new(&source).walk().await.unwrap();

    assert_eq!(outcome.stats.requests, 3, "root + two subcategories");
    assert_eq!(outcome.stats.categories, 1);
    assert_eq!(outcome.stats.subcategories, 2);
    assert_eq!(outcome.stats.subtypes, 3);
    assert_eq!(outcome.stats.departments, 0);

    let records = outcome.into_records();
    let ids: Vec<&str> = records.iter().map(|r| r.external_id.as_str()).collect();
    assert_eq!(ids, ["4241", "4300", "5001"]);

    let oil = &records[0];
    assert_eq!(oil.vendor, Vendor::Mercadona);
    assert!(oil.department.is_none());
    assert_eq!(oil.category, "Aceite, especias y salsas");
    assert_eq!(oil.subcategory, "Aceite, vinagre y sal");
    assert_eq!(oil.subtype, "Aceite de oliva");
    assert!((oil.price - 3.85).abs() < 1e-9);
    assert_eq!(records[2].subcategory, "Especias");
}

#[tokio::test]
async fn walk_aborts_when_a_subcategory_is_rate_limited() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    Mock::given(method("GET"))
        .and(path("/categories/112/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "categories": [{ "id": 420, "name": "Aceite de oliva", "products": [product_json("4241", "Aceite")] }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/categories/115/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let source = test_source(&server);
    let result = CatalogWalker::new(&source).walk().await;

    assert!(
        matches!(result, Err(ScraperError::RateLimited { .. })),
        "expected ScraperError::RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn walk_reports_not_found_subcategory_as_unexpected_status() {
    let server = MockServer::start().await;
    mount_categories(&server).await;

    Mock::given(method("GET"))
        .and(path("/categories/112/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = test_source(&server);
    let result = CatalogWalker::new(&source).walk().await;

    match result {
        Err(ScraperError::UnexpectedStatus { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.contains("/categories/112/"), "url was: {url}");
        }
        other => panic!("expected ScraperError::UnexpectedStatus, got: {other:?}"),
    }
}
