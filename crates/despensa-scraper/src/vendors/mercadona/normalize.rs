//! Normalization from raw Mercadona product JSON to [`Product`].
//!
//! Every field comes from a typed key; nothing is parsed out of free text.

use despensa_core::Product;
use serde_json::Value;

use super::types::MercadonaProduct;
use crate::error::ScraperError;
use crate::parse::size_fits_column;
use crate::vendors::raw_product_id;

/// Normalizes one raw Mercadona product.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if a required key is missing or a
/// price/size value is not numeric, or the size is too large to store.
pub fn normalize_product(raw: Value) -> Result<Product, ScraperError> {
    let fallback_id = raw_product_id(&raw);
    let product: MercadonaProduct =
        serde_json::from_value(raw).map_err(|e| ScraperError::Normalization {
            source_product_id: fallback_id,
            reason: e.to_string(),
        })?;

    let id = product.id;
    let fail = |reason: String| ScraperError::Normalization {
        source_product_id: id.clone(),
        reason,
    };
    let prices = product.price_instructions;

    let size = prices
        .unit_size
        .as_ref()
        .map(crate::parse::Numeric::to_optional_f64)
        .transpose()
        .map_err(|e| fail(format!("unit_size: {e}")))?
        .flatten();
    if let Some(size) = size.filter(|s| !size_fits_column(*s)) {
        return Err(fail(format!("unit_size: {size} is out of range")));
    }
    let price = prices
        .unit_price
        .to_f64()
        .map_err(|e| fail(format!("unit_price: {e}")))?;
    let price_per_size = prices
        .bulk_price
        .to_f64()
        .map_err(|e| fail(format!("bulk_price: {e}")))?;

    let is_pack = prices.is_pack.unwrap_or(false);
    let total_units = if is_pack {
        prices
            .total_units
            .as_ref()
            .map(crate::parse::Numeric::to_optional_u32)
            .transpose()
            .map_err(|e| fail(format!("total_units: {e}")))?
            .flatten()
    } else {
        None
    };

    Ok(Product {
        external_id: id,
        name: product.display_name,
        brand: None,
        image_url: product.thumbnail.unwrap_or_default(),
        size,
        is_approx_size: prices.approx_size.unwrap_or(false),
        size_format: prices.size_format,
        price,
        price_per_size,
        is_pack,
        total_units,
        packaging: product.packaging,
        unit_name: prices.unit_name,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
