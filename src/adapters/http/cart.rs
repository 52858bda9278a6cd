//! Remote cart endpoints over the shared API client.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::cart::Cart;
use crate::domain::foundation::{ProductId, UserId};
use crate::ports::{ApiError, CartApi};

use super::ApiClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRequest {
    user_id: UserId,
    product_id: ProductId,
    quantity: u32,
}

/// `CartApi` against the real backend.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: ApiClient,
}

impl HttpCartApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn fetch(&self, user_id: UserId) -> Result<Cart, ApiError> {
        self.client.get_json(&format!("/api/cart/{}", user_id)).await
    }

    async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        self.client
            .post_json(
                "/api/cart/add",
                &CartItemRequest {
                    user_id,
                    product_id,
                    quantity,
                },
            )
            .await
    }

    async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        self.client
            .put_json(
                "/api/cart/update",
                &CartItemRequest {
                    user_id,
                    product_id,
                    quantity,
                },
            )
            .await
    }

    async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<Cart, ApiError> {
        self.client
            .delete_json(
                "/api/cart/item",
                &[
                    ("userId", user_id.to_string()),
                    ("productId", product_id.to_string()),
                ],
            )
            .await
    }

    async fn clear(&self, user_id: UserId) -> Result<(), ApiError> {
        self.client
            .delete_no_content(&format!("/api/cart/{}", user_id))
            .await
    }
}
