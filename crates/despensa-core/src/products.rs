use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Grocery storefronts the scraper knows how to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vendor {
    Mercadona,
    Consum,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Mercadona, Vendor::Consum];

    /// Display name stored in the `vendor` column, e.g. `"Mercadona"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Vendor::Mercadona => "Mercadona",
            Vendor::Consum => "Consum",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Vendor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mercadona" => Ok(Vendor::Mercadona),
            "consum" => Ok(Vendor::Consum),
            _ => Err(CoreError::UnknownVendor(s.to_owned())),
        }
    }
}

/// A product scraped from a vendor catalog, normalized so both vendors can be
/// stored in the same table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Vendor-assigned product id; the deduplication key.
    pub external_id: String,
    pub name: String,
    pub brand: Option<String>,
    /// Thumbnail URL. Empty when the vendor sends none.
    pub image_url: String,
    /// Total package quantity in `size_format` units (e.g. `0.4` with `"kg"`).
    pub size: Option<f64>,
    /// `true` when the vendor gave no exact packaging format and `size` is an estimate.
    pub is_approx_size: bool,
    /// Unit label for `size`, e.g. `"kg"`, `"l"`, `"ml"`.
    pub size_format: Option<String>,
    /// Total shelf price.
    pub price: f64,
    /// Price per whole `size_format` unit.
    pub price_per_size: f64,
    /// `true` when one external id bundles several physical units.
    pub is_pack: bool,
    /// Number of units inside a pack. Always `None` when `is_pack` is `false`.
    pub total_units: Option<u32>,
    /// Packaging descriptor, e.g. `"Garrafa"`, `"Pack-2"`.
    pub packaging: Option<String>,
    /// Name of a single unit, e.g. `"paquetes"`.
    pub unit_name: Option<String>,
}
