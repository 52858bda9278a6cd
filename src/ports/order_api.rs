//! Order placement and confirmation port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{OrderId, UserId};
use crate::domain::order::Order;

use super::ApiError;

/// Payload for `POST /api/orders/place`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: UserId,
    pub payment_method: String,
    pub shipping_address: String,
}

/// Calls the order endpoints.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Places an order from the user's current server-side cart.
    async fn place(&self, request: PlaceOrderRequest) -> Result<Order, ApiError>;

    /// Fetches an order for the confirmation page.
    async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::payment_method;

    #[test]
    fn place_order_request_serializes_with_camel_case_keys() {
        let req = PlaceOrderRequest {
            user_id: UserId::new(101),
            payment_method: payment_method::CASH_ON_DELIVERY.to_string(),
            shipping_address: "12 High St".to_string(),
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userId"], 101);
        assert_eq!(json["paymentMethod"], "COD");
        assert_eq!(json["shippingAddress"], "12 High St");
    }
}
