//! Product catalog port.

use async_trait::async_trait;

use crate::domain::catalog::Product;
use crate::domain::foundation::ProductId;

use super::ApiError;

/// Reads the product catalog.
///
/// The cart reconciler uses `get` to enrich guest-added lines with the
/// current name and price; search backs the storefront's product listing.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// `GET /api/products` - optionally filtered by a search term.
    async fn search(&self, term: Option<&str>) -> Result<Vec<Product>, ApiError>;

    /// `GET /api/products/{id}`
    async fn get(&self, product_id: ProductId) -> Result<Product, ApiError>;
}
