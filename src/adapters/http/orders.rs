//! Order endpoints over the shared API client.

use async_trait::async_trait;

use crate::domain::foundation::OrderId;
use crate::domain::order::Order;
use crate::ports::{ApiError, OrderApi, PlaceOrderRequest};

use super::ApiClient;

/// `OrderApi` against the real backend.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    client: ApiClient,
}

impl HttpOrderApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    async fn place(&self, request: PlaceOrderRequest) -> Result<Order, ApiError> {
        tracing::debug!(user_id = %request.user_id, "placing order");
        self.client.post_json("/api/orders/place", &request).await
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.client
            .get_json(&format!("/api/orders/{}", order_id))
            .await
    }
}
