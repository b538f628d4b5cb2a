//! Depth-first catalog traversal over any [`CatalogSource`].
//!
//! The walk is strictly sequential: one request at a time, in traversal
//! order. The accumulator is created per walk and returned at the end, so a
//! walk is a function of the source and nothing else.

use std::time::Duration;

use despensa_core::{Catalog, CatalogPath, CatalogRecord, ProductErrorPolicy, Vendor};

use crate::error::ScraperError;
use crate::source::{CatalogNode, CatalogSource, Children, Level};

/// Counters collected while walking; logged at the end of every walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub departments: usize,
    pub categories: usize,
    pub subcategories: usize,
    pub subtypes: usize,
    /// Products normalized successfully, duplicates included.
    pub products: usize,
    /// Products dropped under [`ProductErrorPolicy::Skip`].
    pub skipped_products: usize,
    pub requests: usize,
}

impl WalkStats {
    fn record_node(&mut self, level: Level) {
        match level {
            Level::Department => self.departments += 1,
            Level::Category => self.categories += 1,
            Level::Subcategory => self.subcategories += 1,
            Level::Subtype => self.subtypes += 1,
        }
    }
}

/// Result of a completed walk.
#[derive(Debug)]
pub struct WalkOutcome {
    pub vendor: Vendor,
    pub catalog: Catalog,
    pub stats: WalkStats,
}

impl WalkOutcome {
    /// Flattens the walk into one record per unique external id.
    #[must_use]
    pub fn into_records(self) -> Vec<CatalogRecord> {
        let vendor = self.vendor;
        if self.catalog.is_empty() {
            tracing::warn!(%vendor, "catalog walk collected no products");
            return Vec::new();
        }

        let collected = self.catalog.len();
        let records = self.catalog.flatten(vendor);
        tracing::debug!(
            %vendor,
            collected,
            unique = records.len(),
            duplicates = collected - records.len(),
            "catalog flattened"
        );
        records
    }
}

/// Names of the nodes above the one currently being visited.
#[derive(Debug, Clone, Default)]
struct Ancestry {
    department: Option<String>,
    category: Option<String>,
    subcategory: Option<String>,
    subtype: Option<String>,
}

impl Ancestry {
    fn descend(&self, level: Level, name: &str) -> Self {
        let mut next = self.clone();
        let slot = match level {
            Level::Department => &mut next.department,
            Level::Category => &mut next.category,
            Level::Subcategory => &mut next.subcategory,
            Level::Subtype => &mut next.subtype,
        };
        *slot = Some(name.to_owned());
        next
    }

    fn to_path(&self, node_id: &str) -> Result<CatalogPath, ScraperError> {
        match (&self.category, &self.subcategory, &self.subtype) {
            (Some(category), Some(subcategory), Some(subtype)) => Ok(CatalogPath {
                department: self.department.clone(),
                category: category.clone(),
                subcategory: subcategory.clone(),
                subtype: subtype.clone(),
            }),
            _ => Err(ScraperError::Traversal {
                node_id: node_id.to_owned(),
                reason: "products found above the subtype level".to_string(),
            }),
        }
    }
}

/// Walks a vendor catalog tree and collects every product it finds.
pub struct CatalogWalker<'a, S> {
    source: &'a S,
    policy: ProductErrorPolicy,
    inter_request_delay: Duration,
}

impl<'a, S: CatalogSource> CatalogWalker<'a, S> {
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            policy: ProductErrorPolicy::default(),
            inter_request_delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ProductErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Pause between consecutive requests. Zero disables the pause.
    #[must_use]
    pub fn with_inter_request_delay(mut self, delay_ms: u64) -> Self {
        self.inter_request_delay = Duration::from_millis(delay_ms);
        self
    }

    /// Issues the top-level listing call.
    ///
    /// # Errors
    ///
    /// Propagates any transport error from [`CatalogSource::fetch_root`].
    pub async fn walk_root(
        &self,
        stats: &mut WalkStats,
    ) -> Result<Vec<CatalogNode<S::RawProduct>>, ScraperError> {
        let vendor = self.source.vendor();
        tracing::info!(%vendor, "fetching catalog root");
        stats.requests += 1;
        let roots = self.source.fetch_root().await?;
        tracing::info!(%vendor, nodes = roots.len(), "catalog root fetched");
        Ok(roots)
    }

    /// Walks the whole tree depth-first, children in the order the API
    /// returned them.
    ///
    /// **All-or-nothing semantics**: any transport failure aborts the walk
    /// and drops what was collected so far. Product normalization failures
    /// abort as well unless the walker was built with
    /// [`ProductErrorPolicy::Skip`].
    ///
    /// # Errors
    ///
    /// Returns the first transport or traversal error, or the first
    /// normalization error under [`ProductErrorPolicy::Abort`].
    pub async fn walk(&self) -> Result<WalkOutcome, ScraperError> {
        let vendor = self.source.vendor();
        let mut stats = WalkStats::default();
        let mut catalog = Catalog::new();

        let roots = self.walk_root(&mut stats).await?;
        let mut stack: Vec<(CatalogNode<S::RawProduct>, Ancestry)> = Vec::new();
        push_children(&mut stack, roots, &Ancestry::default());

        while let Some((node, parent)) = stack.pop() {
            stats.record_node(node.level);
            let ancestry = parent.descend(node.level, &node.name);

            match node.children {
                Children::Nodes(children) => {
                    push_children(&mut stack, children, &ancestry);
                }
                Children::Remote => {
                    tracing::info!(%vendor, level = %node.level, name = %node.name, "fetching children");
                    self.pause().await;
                    stats.requests += 1;
                    let children = self.source.fetch_children(&node.external_id).await?;
                    push_children(&mut stack, children, &ancestry);
                }
                Children::Products(raw) => {
                    self.collect_products(
                        raw,
                        &ancestry,
                        &node.external_id,
                        &mut catalog,
                        &mut stats,
                    )?;
                }
                Children::RemoteProducts => {
                    tracing::info!(%vendor, name = %node.name, "fetching products");
                    self.pause().await;
                    stats.requests += 1;
                    let raw = self.source.fetch_leaf_products(&node.external_id).await?;
                    self.collect_products(
                        raw,
                        &ancestry,
                        &node.external_id,
                        &mut catalog,
                        &mut stats,
                    )?;
                }
            }
        }

        tracing::info!(
            %vendor,
            departments = stats.departments,
            categories = stats.categories,
            subcategories = stats.subcategories,
            subtypes = stats.subtypes,
            products = stats.products,
            skipped_products = stats.skipped_products,
            requests = stats.requests,
            "catalog walk complete"
        );

        Ok(WalkOutcome {
            vendor,
            catalog,
            stats,
        })
    }

    fn collect_products(
        &self,
        raw_products: Vec<S::RawProduct>,
        ancestry: &Ancestry,
        node_id: &str,
        catalog: &mut Catalog,
        stats: &mut WalkStats,
    ) -> Result<(), ScraperError> {
        if raw_products.is_empty() {
            return Ok(());
        }
        let path = ancestry.to_path(node_id)?;

        for raw in raw_products {
            match self.source.normalize_product(raw) {
                Ok(product) => {
                    catalog.push(path.clone(), product);
                    stats.products += 1;
                }
                Err(err) if self.policy == ProductErrorPolicy::Skip && !err.is_transport() => {
                    tracing::warn!(
                        vendor = %self.source.vendor(),
                        subtype = %path.subtype,
                        error = %err,
                        "skipping product that failed to normalize"
                    );
                    stats.skipped_products += 1;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    async fn pause(&self) {
        if !self.inter_request_delay.is_zero() {
            tokio::time::sleep(self.inter_request_delay).await;
        }
    }
}

/// Pushes `children` so that they pop in their original order.
fn push_children<P>(
    stack: &mut Vec<(CatalogNode<P>, Ancestry)>,
    children: Vec<CatalogNode<P>>,
    ancestry: &Ancestry,
) {
    stack.extend(
        children
            .into_iter()
            .rev()
            .map(|child| (child, ancestry.clone())),
    );
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod tests;
