//! Normalization from raw Consum product JSON to [`Product`].
//!
//! Size, unit, and pack count are not structured in the Consum API; they
//! are recovered from the description by [`crate::parse::parse_description`].

use despensa_core::Product;
use serde_json::Value;

use super::types::ConsumProduct;
use crate::error::ScraperError;
use crate::parse::{is_truthy, parse_description};
use crate::vendors::raw_product_id;

/// Normalizes one raw Consum product.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if a required key is missing, the
/// price list is empty, or the description cannot be parsed.
pub fn normalize_product(raw: Value) -> Result<Product, ScraperError> {
    let fallback_id = raw_product_id(&raw);
    let product: ConsumProduct =
        serde_json::from_value(raw).map_err(|e| ScraperError::Normalization {
            source_product_id: fallback_id,
            reason: e.to_string(),
        })?;

    let id = product.id;
    let fail = |reason: String| ScraperError::Normalization {
        source_product_id: id.clone(),
        reason,
    };
    let data = product.product_data;

    let parsed = parse_description(&data.description, &data.name)
        .map_err(|e| fail(format!("description: {e}")))?;
    let is_approx_size = !data.format.as_ref().is_some_and(is_truthy);

    // Only the first (current) price is used; promotions further down the
    // list are ignored.
    let current = product
        .price_data
        .prices
        .first()
        .ok_or_else(|| fail("price list is empty".to_string()))?;
    let price = current
        .value
        .cent_amount
        .to_f64()
        .map_err(|e| fail(format!("centAmount: {e}")))?;
    let price_per_size = current
        .value
        .cent_unit_amount
        .to_f64()
        .map_err(|e| fail(format!("centUnitAmount: {e}")))?;

    Ok(Product {
        external_id: id,
        name: data.name,
        brand: Some(data.brand.name),
        image_url: data.image_url,
        size: parsed.size,
        is_approx_size,
        size_format: parsed.size_format,
        price,
        price_per_size,
        is_pack: parsed.is_pack,
        total_units: parsed.total_units,
        packaging: None,
        unit_name: None,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
