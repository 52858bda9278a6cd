//! Checkout flow: gate on a live session, validate inputs, place the order.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::order::{payment_method, Order};
use crate::ports::{OrderApi, PlaceOrderRequest};

use super::{CartReconciler, SessionManager};

/// What the checkout form submits.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Defaults to cash-on-delivery when blank.
    pub payment_method: String,
    pub shipping_address: String,
}

/// Checkout failures, each mapping to a message the page can show.
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// No usable session; the page redirects to login.
    #[error("Sign in to check out")]
    NotSignedIn,

    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// Bad form input, rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The cart could not be loaded for the final check.
    #[error("Failed to load cart: {0}")]
    CartUnavailable(String),

    /// The backend rejected or failed the placement.
    #[error("{0}")]
    OrderFailed(String),
}

/// Places an order from the signed-in user's server-side cart.
pub struct PlaceOrderHandler {
    session: Arc<SessionManager>,
    cart: Arc<CartReconciler>,
    orders: Arc<dyn OrderApi>,
}

impl PlaceOrderHandler {
    pub fn new(
        session: Arc<SessionManager>,
        cart: Arc<CartReconciler>,
        orders: Arc<dyn OrderApi>,
    ) -> Self {
        Self {
            session,
            cart,
            orders,
        }
    }

    /// Runs the checkout: session check (with expiry self-heal), input
    /// validation, empty-cart check, placement, then a best-effort cart
    /// clear. The order is returned for the confirmation page even if the
    /// final clear fails.
    pub async fn place_order(&self, request: CheckoutRequest) -> Result<Order, CheckoutError> {
        if !self.session.is_logged_in().await {
            return Err(CheckoutError::NotSignedIn);
        }
        let user_id = self
            .session
            .user_id()
            .await
            .ok_or(CheckoutError::NotSignedIn)?;

        let shipping_address = request.shipping_address.trim();
        if shipping_address.is_empty() {
            return Err(CheckoutError::Validation(
                "Shipping address required".to_string(),
            ));
        }
        let payment = if request.payment_method.trim().is_empty() {
            payment_method::CASH_ON_DELIVERY.to_string()
        } else {
            request.payment_method.trim().to_string()
        };

        let cart = self
            .cart
            .get_cart(Some(user_id))
            .await
            .map_err(|e| CheckoutError::CartUnavailable(e.to_string()))?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = self
            .orders
            .place(PlaceOrderRequest {
                user_id,
                payment_method: payment,
                shipping_address: shipping_address.to_string(),
            })
            .await
            .map_err(|e| CheckoutError::OrderFailed(e.message().to_string()))?;

        tracing::info!(order_id = %order.id, user_id = %user_id, "order placed");

        if let Err(err) = self.cart.clear_cart(Some(user_id)).await {
            tracing::warn!(error = %err, "cart clear after order placement failed");
        }

        Ok(order)
    }
}
