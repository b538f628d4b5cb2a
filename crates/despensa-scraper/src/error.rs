use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("maximum request limit reached at {url} (HTTP 429); wait before scraping again")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("normalization error for product {source_product_id}: {reason}")]
    Normalization {
        source_product_id: String,
        reason: String,
    },

    #[error("catalog traversal error at node {node_id}: {reason}")]
    Traversal { node_id: String, reason: String },
}

impl ScraperError {
    /// Returns `true` for failures of the HTTP layer: bad status, network
    /// errors, or a body that is not the expected JSON.
    ///
    /// Transport failures always abort a walk, regardless of the product
    /// error policy.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ScraperError::Http(_)
                | ScraperError::Deserialize { .. }
                | ScraperError::RateLimited { .. }
                | ScraperError::UnexpectedStatus { .. }
                | ScraperError::InvalidBaseUrl { .. }
        )
    }
}
