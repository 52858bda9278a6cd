//! Placed orders, as returned by the order endpoints.

use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::foundation::{OrderId, UserId};

/// Payment methods the checkout form offers.
pub mod payment_method {
    pub const CASH_ON_DELIVERY: &str = "COD";
    pub const ONLINE: &str = "ONLINE";
}

/// An order as the backend reports it.
///
/// Only `id` is guaranteed; the rest depends on how much the backend
/// includes in the placement response vs. the confirmation fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub grand_total: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_placement_response_with_only_an_id() {
        let order: Order = serde_json::from_str(r#"{ "id": 9001 }"#).unwrap();
        assert_eq!(order.id, OrderId::new(9001));
        assert!(order.items.is_empty());
    }

    #[test]
    fn deserializes_confirmation_payload() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 12,
                "userId": 101,
                "status": "PLACED",
                "paymentMethod": "COD",
                "shippingAddress": "12 High St",
                "items": [
                    { "productId": 42, "productName": "Oat Bar", "quantity": 2, "unitPrice": 3.5, "totalPrice": 7.0 }
                ],
                "grandTotal": 7.0
            }"#,
        )
        .unwrap();

        assert_eq!(order.user_id, Some(UserId::new(101)));
        assert_eq!(order.payment_method.as_deref(), Some(payment_method::CASH_ON_DELIVERY));
        assert_eq!(order.grand_total, Some(7.0));
    }
}
