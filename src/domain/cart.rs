//! Shopping cart aggregate.
//!
//! One `Cart` shape serves both storage backends: the server-authoritative
//! cart (keyed by user id) and the guest cart persisted locally as a JSON
//! blob. `grand_total` and each line's `total_price` are derived values;
//! every local mutation goes through `recompute_totals` so they can never
//! drift from the line data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::foundation::{ProductId, UserId};

/// Cart operation failures surfaced to callers.
///
/// Guest-cart paths never produce these; only input validation and the
/// remote backend can fail a cart operation.
#[derive(Debug, Clone, Error)]
pub enum CartError {
    /// Quantities below 1 are rejected before any mutation or network call.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// The remote cart call failed; the message is already human-readable.
    #[error("{0}")]
    Backend(String),
}

impl CartError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// A single product line in a cart.
///
/// `product_name` may be empty for guest-added lines that have not been
/// enriched from the catalog yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total_price: f64,
}

impl CartLine {
    /// Creates a line with its total derived from price and quantity.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Self {
        let mut line = Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            total_price: 0.0,
        };
        line.recompute_total();
        line
    }

    fn recompute_total(&mut self) {
        self.total_price = self.unit_price * f64::from(self.quantity);
    }
}

/// A cart owned by a user, or by the anonymous visitor (`UserId::GUEST`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub grand_total: f64,
}

impl Cart {
    /// Creates an empty cart for the given owner.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            grand_total: 0.0,
        }
    }

    /// Creates an empty guest cart.
    pub fn empty_guest() -> Self {
        Self::empty(UserId::GUEST)
    }

    /// Total quantity across all lines - the value the cart badge shows.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds a line by product id.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.items.iter().find(|l| l.product_id == product_id)
    }

    /// Adds quantity to an existing line, or appends a new one.
    ///
    /// Name and price are only used when the line does not exist yet; an
    /// existing line keeps whatever the cart already knows about the product.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) {
        match self.items.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => self
                .items
                .push(CartLine::new(product_id, product_name, quantity, unit_price)),
        }
        self.recompute_totals();
    }

    /// Sets the quantity of an existing line; no-op if the product is absent.
    ///
    /// Callers reject quantities below 1 before getting here, so a line can
    /// never be left at zero through this path.
    pub fn set_line_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
        self.recompute_totals();
    }

    /// Removes the line for a product. Idempotent when absent.
    pub fn remove_line(&mut self, product_id: ProductId) {
        self.items.retain(|l| l.product_id != product_id);
        self.recompute_totals();
    }

    /// Re-derives every line total and the grand total from line data.
    pub fn recompute_totals(&mut self) {
        for line in &mut self.items {
            line.recompute_total();
        }
        self.grand_total = self.items.iter().map(|l| l.total_price).sum();
    }
}
