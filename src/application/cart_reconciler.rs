//! Cart reconciler - one cart API for guest and signed-in users.
//!
//! Which cart an operation touches is decided fresh on every call from the
//! explicit owner argument, the session's user id, or the guest fallback,
//! in that order. The guest cart is a JSON blob in the durable store,
//! mutated read-modify-write as a whole; the remote cart belongs to the
//! backend. Every operation that fetches or mutates a cart pushes the new
//! item count into the `cart_count` signal as a side effect.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::cart::{Cart, CartError};
use crate::domain::foundation::{ProductId, UserId};
use crate::domain::session::{resolve_owner, OwnerRef};
use crate::ports::{store_keys, CartApi, LocalStore, ProductCatalog};

use super::SessionManager;

/// Unified cart front for the storefront UI.
pub struct CartReconciler {
    session: Arc<SessionManager>,
    cart_api: Arc<dyn CartApi>,
    catalog: Arc<dyn ProductCatalog>,
    store: Arc<dyn LocalStore>,
    count: watch::Sender<u32>,
}

impl CartReconciler {
    pub fn new(
        session: Arc<SessionManager>,
        cart_api: Arc<dyn CartApi>,
        catalog: Arc<dyn ProductCatalog>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        let (count, _) = watch::channel(0);
        Self {
            session,
            cart_api,
            catalog,
            store,
            count,
        }
    }

    /// Live item-count signal (total quantity in the active cart).
    ///
    /// New receivers observe the latest value immediately; subsequent
    /// updates arrive whenever any cart operation runs.
    pub fn cart_count(&self) -> watch::Receiver<u32> {
        self.count.subscribe()
    }

    /// Adds a product to the active cart. Additive when the line exists.
    ///
    /// Guest adds enrich a new line with the catalog's current name and
    /// price, degrading to a zero-priced stub if the lookup fails - a guest
    /// add never fails outright.
    pub async fn add_item(
        &self,
        owner: Option<UserId>,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let cart = match self.effective_owner(owner).await {
            OwnerRef::User(user_id) => self
                .cart_api
                .add_item(user_id, product_id, quantity)
                .await
                .map_err(|e| CartError::backend(e.message()))?,
            OwnerRef::Guest => self.add_to_guest_cart(product_id, quantity).await,
        };

        self.broadcast(&cart);
        Ok(cart)
    }

    /// Fetches the active cart and refreshes the count signal.
    pub async fn get_cart(&self, owner: Option<UserId>) -> Result<Cart, CartError> {
        let cart = match self.effective_owner(owner).await {
            OwnerRef::User(user_id) => self
                .cart_api
                .fetch(user_id)
                .await
                .map_err(|e| CartError::backend(e.message()))?,
            OwnerRef::Guest => self.read_guest_cart().await,
        };

        self.broadcast(&cart);
        Ok(cart)
    }

    /// Sets a line's quantity. No-op if the product is not in the cart.
    pub async fn update_item_quantity(
        &self,
        owner: Option<UserId>,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let cart = match self.effective_owner(owner).await {
            OwnerRef::User(user_id) => self
                .cart_api
                .update_item(user_id, product_id, quantity)
                .await
                .map_err(|e| CartError::backend(e.message()))?,
            OwnerRef::Guest => {
                let mut cart = self.read_guest_cart().await;
                cart.set_line_quantity(product_id, quantity);
                self.persist_guest_cart(&cart).await;
                cart
            }
        };

        self.broadcast(&cart);
        Ok(cart)
    }

    /// Removes a line. Idempotent when the product is absent.
    pub async fn remove_item(
        &self,
        owner: Option<UserId>,
        product_id: ProductId,
    ) -> Result<Cart, CartError> {
        let cart = match self.effective_owner(owner).await {
            OwnerRef::User(user_id) => self
                .cart_api
                .remove_item(user_id, product_id)
                .await
                .map_err(|e| CartError::backend(e.message()))?,
            OwnerRef::Guest => {
                let mut cart = self.read_guest_cart().await;
                cart.remove_line(product_id);
                self.persist_guest_cart(&cart).await;
                cart
            }
        };

        self.broadcast(&cart);
        Ok(cart)
    }

    /// Empties the active cart and drops the count signal to zero.
    pub async fn clear_cart(&self, owner: Option<UserId>) -> Result<(), CartError> {
        match self.effective_owner(owner).await {
            OwnerRef::User(user_id) => self
                .cart_api
                .clear(user_id)
                .await
                .map_err(|e| CartError::backend(e.message()))?,
            OwnerRef::Guest => {
                if let Err(err) = self.store.remove(store_keys::GUEST_CART).await {
                    tracing::warn!(error = %err, "could not delete guest cart slot");
                }
            }
        }

        self.count.send_replace(0);
        Ok(())
    }

    async fn effective_owner(&self, explicit: Option<UserId>) -> OwnerRef {
        resolve_owner(explicit, self.session.user_id().await)
    }

    fn broadcast(&self, cart: &Cart) {
        self.count.send_replace(cart.item_count());
    }

    // ------- Guest cart: whole-blob read-modify-write on the local slot -------

    async fn read_guest_cart(&self) -> Cart {
        match self.store.get(store_keys::GUEST_CART).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::debug!(error = %err, "stored guest cart is unreadable; starting empty");
                Cart::empty_guest()
            }),
            Ok(None) => Cart::empty_guest(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read guest cart; treating as empty");
                Cart::empty_guest()
            }
        }
    }

    async fn persist_guest_cart(&self, cart: &Cart) {
        // Guest operations never fail outward; a lost write costs at most
        // the guest's local cart contents.
        match serde_json::to_string(cart) {
            Ok(raw) => {
                if let Err(err) = self.store.put(store_keys::GUEST_CART, &raw).await {
                    tracing::warn!(error = %err, "guest cart not persisted");
                }
            }
            Err(err) => tracing::warn!(error = %err, "guest cart not serializable"),
        }
    }

    async fn add_to_guest_cart(&self, product_id: ProductId, quantity: u32) -> Cart {
        let mut cart = self.read_guest_cart().await;

        if cart.line(product_id).is_some() {
            cart.add_line(product_id, "", quantity, 0.0);
        } else {
            let (name, price) = match self.catalog.get(product_id).await {
                Ok(product) => (product.name, product.price),
                Err(err) => {
                    tracing::warn!(
                        product_id = %product_id,
                        error = %err,
                        "catalog lookup failed; adding stub line"
                    );
                    (String::new(), 0.0)
                }
            };
            cart.add_line(product_id, name, quantity, price);
        }

        self.persist_guest_cart(&cart).await;
        cart
    }
}

impl std::fmt::Debug for CartReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartReconciler")
            .field("count", &*self.count.borrow())
            .finish_non_exhaustive()
    }
}
