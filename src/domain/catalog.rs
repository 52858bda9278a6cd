//! Catalog product as the backend serves it.

use serde::{Deserialize, Serialize};

use super::foundation::ProductId;

/// A storefront product.
///
/// Image entries are usually backend-relative paths; resolving them against
/// the API base is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sub_description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub mrp: Option<f64>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}
