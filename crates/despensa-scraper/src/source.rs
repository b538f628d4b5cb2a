//! The capability interface every vendor implements so that one
//! [`crate::CatalogWalker`] can traverse any catalog tree.

use async_trait::async_trait;
use despensa_core::{Product, Vendor};

use crate::error::ScraperError;

/// Depth of a node in the catalog tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Department,
    Category,
    Subcategory,
    Subtype,
}

impl Level {
    /// The level one step below `self`, or `None` at the leaf.
    #[must_use]
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Department => Some(Level::Category),
            Level::Category => Some(Level::Subcategory),
            Level::Subcategory => Some(Level::Subtype),
            Level::Subtype => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Department => write!(f, "department"),
            Level::Category => write!(f, "category"),
            Level::Subcategory => write!(f, "subcategory"),
            Level::Subtype => write!(f, "subtype"),
        }
    }
}

/// Where a node's children come from.
///
/// Vendors embed different amounts of the tree in each response: a node's
/// children may already be in the payload, or may need one more request.
#[derive(Debug)]
pub enum Children<P> {
    /// Child nodes embedded in the response that produced this node.
    Nodes(Vec<CatalogNode<P>>),
    /// Child nodes must be fetched with [`CatalogSource::fetch_children`].
    Remote,
    /// Leaf with raw products embedded in the response.
    Products(Vec<P>),
    /// Leaf whose products must be fetched with
    /// [`CatalogSource::fetch_leaf_products`].
    RemoteProducts,
}

/// One node of a vendor's catalog tree, owning its children.
#[derive(Debug)]
pub struct CatalogNode<P> {
    pub external_id: String,
    pub name: String,
    pub level: Level,
    pub children: Children<P>,
}

/// Vendor capabilities the walker is written against.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Raw product payload handed from the fetch step to
    /// [`CatalogSource::normalize_product`].
    type RawProduct: Send;

    fn vendor(&self) -> Vendor;

    /// Issues the top-level listing call.
    async fn fetch_root(&self) -> Result<Vec<CatalogNode<Self::RawProduct>>, ScraperError>;

    /// Fetches the children of a node marked [`Children::Remote`].
    ///
    /// The default errors: vendors that never emit `Remote` need not
    /// implement it.
    async fn fetch_children(
        &self,
        node_id: &str,
    ) -> Result<Vec<CatalogNode<Self::RawProduct>>, ScraperError> {
        Err(ScraperError::Traversal {
            node_id: node_id.to_owned(),
            reason: format!("{} does not serve child nodes remotely", self.vendor()),
        })
    }

    /// Fetches the products of a leaf marked [`Children::RemoteProducts`].
    async fn fetch_leaf_products(
        &self,
        node_id: &str,
    ) -> Result<Vec<Self::RawProduct>, ScraperError> {
        Err(ScraperError::Traversal {
            node_id: node_id.to_owned(),
            reason: format!("{} does not serve leaf products remotely", self.vendor()),
        })
    }

    /// Converts one raw product into the canonical [`Product`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Normalization`] when an expected field is
    /// missing or malformed.
    fn normalize_product(&self, raw: Self::RawProduct) -> Result<Product, ScraperError>;
}
