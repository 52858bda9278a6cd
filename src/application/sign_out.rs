//! Sign-out flow: clear the active cart, then drop the credential.
//!
//! The cart owner is captured before the token goes away so the clear hits
//! the right backend cart. Clearing is best-effort - a dead backend must
//! never trap a user in a session.

use std::sync::Arc;

use crate::domain::foundation::UserId;

use super::{CartReconciler, SessionManager};

/// Logs the user out of this client.
pub struct SignOutFlow {
    session: Arc<SessionManager>,
    cart: Arc<CartReconciler>,
}

impl SignOutFlow {
    pub fn new(session: Arc<SessionManager>, cart: Arc<CartReconciler>) -> Self {
        Self { session, cart }
    }

    /// Clears the session user's cart (or the guest cart when nobody is
    /// signed in), removes the token, and broadcasts the sign-out.
    ///
    /// Guest items are cleared, not carried over to the account - the cart
    /// transition on logout is destructive.
    pub async fn sign_out(&self) {
        let owner = self.session.user_id().await.unwrap_or(UserId::GUEST);

        if let Err(err) = self.cart.clear_cart(Some(owner)).await {
            tracing::warn!(error = %err, "could not clear cart on sign-out");
        }

        self.session.remove_token().await;
    }
}
