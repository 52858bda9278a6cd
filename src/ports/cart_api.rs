//! Remote cart port - the server-authoritative cart, keyed by user id.

use async_trait::async_trait;

use crate::domain::cart::Cart;
use crate::domain::foundation::{ProductId, UserId};

use super::ApiError;

/// Calls the cart endpoints for an identified user.
///
/// The backend owns the cart state: add is additive, update replaces a
/// line's quantity, remove and clear are destructive. Every mutating call
/// returns the updated cart so the caller can rebroadcast the count.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// `GET /api/cart/{userId}`
    async fn fetch(&self, user_id: UserId) -> Result<Cart, ApiError>;

    /// `POST /api/cart/add` - increases quantity if the line already exists.
    async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError>;

    /// `PUT /api/cart/update` - sets the line quantity.
    async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError>;

    /// `DELETE /api/cart/item?userId&productId`
    async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<Cart, ApiError>;

    /// `DELETE /api/cart/{userId}` - empties the whole cart.
    async fn clear(&self, user_id: UserId) -> Result<(), ApiError>;
}
