use serde_json::json;

use super::*;

fn raw_product() -> Value {
    json!({
        "id": "4241",
        "display_name": "Aceite de oliva virgen extra Hacendado",
        "packaging": "Garrafa",
        "thumbnail": "https://prod-mercadona.imgix.net/images/4241.jpg",
        "price_instructions": {
            "unit_size": 5.0,
            "approx_size": false,
            "size_format": "l",
            "unit_price": "34.75",
            "bulk_price": "6.95",
            "is_pack": false,
            "total_units": null,
            "unit_name": null
        }
    })
}

#[test]
fn normalize_product_maps_typed_fields() {
    let product = normalize_product(raw_product()).unwrap();

    assert_eq!(product.external_id, "4241");
    assert_eq!(product.name, "Aceite de oliva virgen extra Hacendado");
    assert_eq!(product.packaging.as_deref(), Some("Garrafa"));
    assert_eq!(
        product.image_url,
        "https://prod-mercadona.imgix.net/images/4241.jpg"
    );
    assert_eq!(product.size, Some(5.0));
    assert!(!product.is_approx_size);
    assert_eq!(product.size_format.as_deref(), Some("l"));
    assert!((product.price - 34.75).abs() < 1e-9);
    assert!((product.price_per_size - 6.95).abs() < 1e-9);
    assert!(!product.is_pack);
    assert!(product.total_units.is_none());
    assert!(product.brand.is_none());
}

#[test]
fn normalize_product_reads_pack_fields() {
    let mut raw = raw_product();
    raw["packaging"] = json!("Pack-6");
    raw["price_instructions"]["is_pack"] = json!(true);
    raw["price_instructions"]["total_units"] = json!(6);
    raw["price_instructions"]["unit_name"] = json!("latas");

    let product = normalize_product(raw).unwrap();

    assert!(product.is_pack);
    assert_eq!(product.total_units, Some(6));
    assert_eq!(product.unit_name.as_deref(), Some("latas"));
}

#[test]
fn normalize_product_ignores_units_when_not_a_pack() {
    let mut raw = raw_product();
    raw["price_instructions"]["total_units"] = json!(3);

    let product = normalize_product(raw).unwrap();

    assert!(!product.is_pack);
    assert!(product.total_units.is_none());
}

#[test]
fn normalize_product_null_unit_size_is_absent() {
    let mut raw = raw_product();
    raw["price_instructions"]["unit_size"] = json!(null);
    raw["price_instructions"]["approx_size"] = json!(true);

    let product = normalize_product(raw).unwrap();

    assert!(product.size.is_none());
    assert!(product.is_approx_size);
}

#[test]
fn normalize_product_accepts_numeric_id_and_string_size() {
    let mut raw = raw_product();
    raw["id"] = json!(4241);
    raw["price_instructions"]["unit_size"] = json!("0.4");

    let product = normalize_product(raw).unwrap();

    assert_eq!(product.external_id, "4241");
    assert_eq!(product.size, Some(0.4));
}

#[test]
fn normalize_product_missing_price_instructions_is_an_error() {
    let mut raw = raw_product();
    raw.as_object_mut().unwrap().remove("price_instructions");

    let err = normalize_product(raw).unwrap_err();

    assert!(
        matches!(err, ScraperError::Normalization { ref source_product_id, .. } if source_product_id == "4241"),
        "expected Normalization(4241), got: {err:?}"
    );
}

#[test]
fn normalize_product_non_numeric_price_is_an_error() {
    let mut raw = raw_product();
    raw["price_instructions"]["unit_price"] = json!("gratis");

    let err = normalize_product(raw).unwrap_err();

    assert!(
        matches!(err, ScraperError::Normalization { ref reason, .. } if reason.contains("unit_price")),
        "expected unit_price Normalization, got: {err:?}"
    );
}

#[test]
fn normalize_product_oversized_unit_size_is_an_error() {
    let mut raw = raw_product();
    raw["price_instructions"]["unit_size"] = json!("1e12");

    let err = normalize_product(raw).unwrap_err();

    assert!(
        matches!(err, ScraperError::Normalization { ref reason, .. }
            if reason.contains("out of range")),
        "expected out-of-range unit_size, got: {err:?}"
    );
}
