//! Mercadona API response types.
//!
//! ## Observed shape
//!
//! ### `GET /categories/`
//! `{"results": [{"id": 12, "name": "Aceite, especias y salsas",
//! "categories": [{"id": 112, "name": "Aceite, vinagre y sal"}]}]}`.
//! Top-level entries are categories; their embedded `categories` are
//! subcategories. Products are not included at this level.
//!
//! ### `GET /categories/{id}/`
//! `{"id": 112, "name": "...", "categories": [{"id": 420, "name": "Aceite de oliva",
//! "products": [...]}]}`. The embedded `categories` are subtypes, each
//! carrying its full product list.
//!
//! ### Products
//! `id` is a string (`"4241"`). Prices inside `price_instructions` are
//! decimal strings (`"3.85"`); `unit_size` is a number; `total_units` is
//! `null` unless the product is a pack. Products are kept as raw JSON until
//! normalization so one malformed product does not fail the whole response.

use serde::Deserialize;
use serde_json::Value;

use crate::parse::{deserialize_external_id, Numeric};

/// Response of `GET /categories/`.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub results: Vec<MercadonaCategory>,
}

#[derive(Debug, Deserialize)]
pub struct MercadonaCategory {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<MercadonaSubcategory>,
}

#[derive(Debug, Deserialize)]
pub struct MercadonaSubcategory {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub id: String,
    pub name: String,
}

/// Response of `GET /categories/{id}/`.
#[derive(Debug, Deserialize)]
pub struct SubcategoryDetail {
    #[serde(default)]
    pub categories: Vec<MercadonaSubtype>,
}

#[derive(Debug, Deserialize)]
pub struct MercadonaSubtype {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MercadonaProduct {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub id: String,
    pub display_name: String,
    /// `"Garrafa"`, `"Pack-2"`, ...
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub price_instructions: PriceInstructions,
}

#[derive(Debug, Deserialize)]
pub struct PriceInstructions {
    #[serde(default)]
    pub unit_size: Option<Numeric>,
    #[serde(default)]
    pub approx_size: Option<bool>,
    #[serde(default)]
    pub size_format: Option<String>,
    pub unit_price: Numeric,
    pub bulk_price: Numeric,
    #[serde(default)]
    pub is_pack: Option<bool>,
    #[serde(default)]
    pub total_units: Option<Numeric>,
    #[serde(default)]
    pub unit_name: Option<String>,
}
