//! Consum storefront: the whole department tree in one menu call, then one
//! product listing call per subtype.

mod normalize;
pub mod types;

use async_trait::async_trait;
use despensa_core::{Product, Vendor};
use serde_json::Value;

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::source::{CatalogNode, CatalogSource, Children, Level};

pub use normalize::normalize_product;
use types::{ConsumMenuNode, ProductsResponse};

pub const DEFAULT_BASE_URL: &str = "https://tienda.consum.es/api/rest/V1.0";

/// Product listing sort order the storefront itself uses.
const ORDER_BY_ID: &str = "7";

/// [`CatalogSource`] for `tienda.consum.es`.
#[derive(Debug, Clone)]
pub struct ConsumSource {
    client: CatalogClient,
    base_url: String,
    page_limit: u32,
}

impl ConsumSource {
    /// `page_limit` is sent as the listing `limit`; it must be large enough
    /// that one page holds every product of a subtype, since only offset 0
    /// is requested.
    #[must_use]
    pub fn new(client: CatalogClient, base_url: &str, page_limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.to_owned(),
            page_limit,
        }
    }
}

/// Converts a menu node and its descendants, assigning levels top-down.
///
/// Nodes deeper than the subtype level are not expected; if present they
/// are dropped and their subtype parent is still listed remotely.
fn menu_node(node: ConsumMenuNode, level: Level) -> CatalogNode<Value> {
    let children = match level.child() {
        Some(child_level) => Children::Nodes(
            node.subcategories
                .into_iter()
                .map(|child| menu_node(child, child_level))
                .collect(),
        ),
        None => Children::RemoteProducts,
    };

    CatalogNode {
        external_id: node.id,
        name: node.nombre,
        level,
        children,
    }
}

#[async_trait]
impl CatalogSource for ConsumSource {
    type RawProduct = Value;

    fn vendor(&self) -> Vendor {
        Vendor::Consum
    }

    async fn fetch_root(&self) -> Result<Vec<CatalogNode<Value>>, ScraperError> {
        let menu: Vec<ConsumMenuNode> = self
            .client
            .get_json(&self.base_url, "shopping/category/menu", &[])
            .await?;

        Ok(menu
            .into_iter()
            .map(|department| menu_node(department, Level::Department))
            .collect())
    }

    async fn fetch_leaf_products(&self, node_id: &str) -> Result<Vec<Value>, ScraperError> {
        let query = [
            ("limit", self.page_limit.to_string()),
            ("offset", "0".to_string()),
            ("orderById", ORDER_BY_ID.to_string()),
            ("showRecommendations", "false".to_string()),
            ("categories", node_id.to_owned()),
        ];
        let response: ProductsResponse = self
            .client
            .get_json(&self.base_url, "catalog/product", &query)
            .await?;

        tracing::debug!(
            subtype = node_id,
            count = response.products.len(),
            "fetched consum products"
        );
        Ok(response.products)
    }

    fn normalize_product(&self, raw: Value) -> Result<Product, ScraperError> {
        normalize_product(raw)
    }
}
