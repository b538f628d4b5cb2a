//! Walk accumulator and flattening of `(ancestry, product)` pairs into
//! table-ready [`CatalogRecord`]s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::products::{Product, Vendor};

/// Names of every tree level above a product.
///
/// `department` is only populated for vendors whose tree has a department
/// level above categories (Consum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPath {
    pub department: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub subtype: String,
}

/// One flattened row: every [`Product`] field plus its ancestry and vendor.
///
/// Fields are spelled out rather than `#[serde(flatten)]`-ed so the record
/// serializes as a flat CSV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub external_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub image_url: String,
    pub size: Option<f64>,
    pub is_approx_size: bool,
    pub size_format: Option<String>,
    pub price: f64,
    pub price_per_size: f64,
    pub is_pack: bool,
    pub total_units: Option<u32>,
    pub packaging: Option<String>,
    pub unit_name: Option<String>,
    pub department: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub subtype: String,
    pub vendor: Vendor,
}

impl CatalogRecord {
    #[must_use]
    pub fn new(vendor: Vendor, path: CatalogPath, product: Product) -> Self {
        Self {
            external_id: product.external_id,
            name: product.name,
            brand: product.brand,
            image_url: product.image_url,
            size: product.size,
            is_approx_size: product.is_approx_size,
            size_format: product.size_format,
            price: product.price,
            price_per_size: product.price_per_size,
            is_pack: product.is_pack,
            total_units: product.total_units,
            packaging: product.packaging,
            unit_name: product.unit_name,
            department: path.department,
            category: path.category,
            subcategory: path.subcategory,
            subtype: path.subtype,
            vendor,
        }
    }
}

/// Products collected during one walk, each paired with the path it was
/// found under. Owned by a single walk and consumed by [`Catalog::flatten`].
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<(CatalogPath, Product)>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: CatalogPath, product: Product) {
        self.entries.push((path, product));
    }

    /// Number of products collected, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens the collected products into one record per unique
    /// `external_id`.
    ///
    /// When an id appears under several subtypes the last occurrence wins,
    /// but the record keeps the position where the id was first seen.
    #[must_use]
    pub fn flatten(self, vendor: Vendor) -> Vec<CatalogRecord> {
        let mut records: Vec<CatalogRecord> = Vec::with_capacity(self.entries.len());
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(self.entries.len());

        for (path, product) in self.entries {
            let record = CatalogRecord::new(vendor, path, product);
            if let Some(&idx) = positions.get(&record.external_id) {
                records[idx] = record;
            } else {
                positions.insert(record.external_id.clone(), records.len());
                records.push(record);
            }
        }

        records
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
