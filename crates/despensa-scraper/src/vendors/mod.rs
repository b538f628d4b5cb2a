//! Concrete [`crate::CatalogSource`] implementations, one per storefront.

pub mod consum;
pub mod mercadona;

pub use consum::ConsumSource;
pub use mercadona::MercadonaSource;

use serde_json::Value;

/// Best-effort product id for error messages when a raw product does not
/// deserialize.
pub(crate) fn raw_product_id(raw: &Value) -> String {
    match raw.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "<unknown>".to_string(),
    }
}
