//! Mercadona storefront: categories → subcategories from one listing call,
//! then one call per subcategory returning subtypes with their products.

mod normalize;
pub mod types;

use async_trait::async_trait;
use despensa_core::{Product, Vendor};
use serde_json::Value;

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::source::{CatalogNode, CatalogSource, Children, Level};

pub use normalize::normalize_product;
use types::{CategoriesResponse, SubcategoryDetail};

pub const DEFAULT_BASE_URL: &str = "https://tienda.mercadona.es/api";

/// [`CatalogSource`] for `tienda.mercadona.es`.
#[derive(Debug, Clone)]
pub struct MercadonaSource {
    client: CatalogClient,
    base_url: String,
    lang: String,
    warehouse: String,
}

impl MercadonaSource {
    /// `lang` and `warehouse` (e.g. `"es"`, `"vlc1"`) are sent on every
    /// request; the warehouse decides which local assortment is listed.
    #[must_use]
    pub fn new(client: CatalogClient, base_url: &str, lang: &str, warehouse: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_owned(),
            lang: lang.to_owned(),
            warehouse: warehouse.to_owned(),
        }
    }

    fn location_query(&self) -> [(&'static str, String); 2] {
        [("lang", self.lang.clone()), ("wh", self.warehouse.clone())]
    }
}

#[async_trait]
impl CatalogSource for MercadonaSource {
    type RawProduct = Value;

    fn vendor(&self) -> Vendor {
        Vendor::Mercadona
    }

    async fn fetch_root(&self) -> Result<Vec<CatalogNode<Value>>, ScraperError> {
        let response: CategoriesResponse = self
            .client
            .get_json(&self.base_url, "categories", &self.location_query())
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|category| CatalogNode {
                external_id: category.id,
                name: category.name,
                level: Level::Category,
                children: Children::Nodes(
                    category
                        .categories
                        .into_iter()
                        .map(|subcategory| CatalogNode {
                            external_id: subcategory.id,
                            name: subcategory.name,
                            level: Level::Subcategory,
                            children: Children::Remote,
                        })
                        .collect(),
                ),
            })
            .collect())
    }

    async fn fetch_children(&self, node_id: &str) -> Result<Vec<CatalogNode<Value>>, ScraperError> {
        let path = format!("categories/{node_id}");
        let detail: SubcategoryDetail = self
            .client
            .get_json(&self.base_url, &path, &self.location_query())
            .await?;

        Ok(detail
            .categories
            .into_iter()
            .map(|subtype| CatalogNode {
                external_id: subtype.id,
                name: subtype.name,
                level: Level::Subtype,
                children: Children::Products(subtype.products),
            })
            .collect())
    }

    fn normalize_product(&self, raw: Value) -> Result<Product, ScraperError> {
        normalize_product(raw)
    }
}
