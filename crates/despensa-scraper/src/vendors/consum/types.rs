//! Consum API response types.
//!
//! ## Observed shape
//!
//! ### `GET /shopping/category/menu/`
//! A bare JSON array of departments. Every node carries `id`, `nombre`, and
//! a nested `subcategories` array, four levels deep: department → category
//! → subcategory → subtype. The whole tree arrives in this one response.
//!
//! ### `GET /catalog/product/?categories={id}&limit=...`
//! `{"totalCount": 37, "products": [...]}`. Each product splits its data into
//! `productData` (name, brand, image, free-text `description`, optional
//! `format`) and `priceData` (a list of prices; the first one is current).
//! `centAmount` is the shelf price in euros despite the name.

use serde::Deserialize;
use serde_json::Value;

use crate::parse::{deserialize_external_id, Numeric};

/// One node of the `shopping/category/menu` tree.
#[derive(Debug, Deserialize)]
pub struct ConsumMenuNode {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub subcategories: Vec<ConsumMenuNode>,
}

/// Response of `GET /catalog/product/`.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ConsumProduct {
    #[serde(deserialize_with = "deserialize_external_id")]
    pub id: String,
    #[serde(rename = "productData")]
    pub product_data: ProductData,
    #[serde(rename = "priceData")]
    pub price_data: PriceData,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub brand: Brand,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Free text such as `"Leche entera 1,5 l"` or `"Cerveza 6 x 330 ml"`.
    pub description: String,
    /// Structured packaging format; absent when the vendor only knows an
    /// approximate size.
    #[serde(default)]
    pub format: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Brand {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceData {
    pub prices: Vec<Price>,
}

#[derive(Debug, Deserialize)]
pub struct Price {
    pub value: PriceValue,
}

#[derive(Debug, Deserialize)]
pub struct PriceValue {
    #[serde(rename = "centAmount")]
    pub cent_amount: Numeric,
    #[serde(rename = "centUnitAmount")]
    pub cent_unit_amount: Numeric,
}
