pub mod client;
pub mod error;
pub mod parse;
pub mod source;
pub mod vendors;
pub mod walker;

pub use client::CatalogClient;
pub use error::ScraperError;
pub use source::{CatalogNode, CatalogSource, Children, Level};
pub use vendors::{ConsumSource, MercadonaSource};
pub use walker::{CatalogWalker, WalkOutcome, WalkStats};
