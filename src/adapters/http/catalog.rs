//! Product catalog endpoints over the shared API client.

use async_trait::async_trait;

use crate::domain::catalog::Product;
use crate::domain::foundation::ProductId;
use crate::ports::{ApiError, ProductCatalog};

use super::ApiClient;

/// `ProductCatalog` against the real backend.
#[derive(Debug, Clone)]
pub struct HttpProductCatalog {
    client: ApiClient,
}

impl HttpProductCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn search(&self, term: Option<&str>) -> Result<Vec<Product>, ApiError> {
        match term {
            Some(term) if !term.is_empty() => {
                self.client
                    .get_json_with_query("/api/products", &[("search", term.to_string())])
                    .await
            }
            _ => self.client.get_json("/api/products").await,
        }
    }

    async fn get(&self, product_id: ProductId) -> Result<Product, ApiError> {
        self.client
            .get_json(&format!("/api/products/{}", product_id))
            .await
    }
}
