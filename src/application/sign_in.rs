//! Sign-in flow: authenticate, then refresh the cart badge.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::session::{AuthError, Session};

use super::{CartReconciler, SessionManager};

/// Logs a user in and brings the cart count up to date for the new session.
pub struct SignInFlow {
    session: Arc<SessionManager>,
    cart: Arc<CartReconciler>,
}

impl SignInFlow {
    pub fn new(session: Arc<SessionManager>, cart: Arc<CartReconciler>) -> Self {
        Self { session, cart }
    }

    /// Authenticates and refreshes the cart for the signed-in user.
    ///
    /// The cart refresh is cosmetic (it re-primes the count signal); its
    /// failure does not undo a successful login.
    pub async fn sign_in(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Session, AuthError> {
        let session = self.session.login(email, password).await?;

        if let Err(err) = self.cart.get_cart(None).await {
            tracing::warn!(error = %err, "cart refresh after sign-in failed");
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InProcessSessionBus;
    use crate::adapters::mock::MockBackend;
    use crate::adapters::storage::InMemoryLocalStore;
    use crate::domain::catalog::Product;
    use crate::domain::foundation::{ProductId, UserId};
    use crate::ports::CartApi;

    fn product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: None,
            sub_description: None,
            price,
            mrp: None,
            stock: None,
            images: Vec::new(),
            category: None,
        }
    }

    fn flow(backend: Arc<MockBackend>) -> (SignInFlow, Arc<CartReconciler>) {
        let store = Arc::new(InMemoryLocalStore::new());
        let session = Arc::new(SessionManager::new(
            backend.clone(),
            store.clone(),
            Arc::new(InProcessSessionBus::new()),
        ));
        let cart = Arc::new(CartReconciler::new(
            session.clone(),
            backend.clone(),
            backend,
            store,
        ));
        (SignInFlow::new(session, cart.clone()), cart)
    }

    #[tokio::test]
    async fn sign_in_primes_the_count_from_the_account_cart() {
        let backend = Arc::new(
            MockBackend::new()
                .with_product(product(42, "Oat Bar", 3.5))
                .with_account(101, "Alice", "alice@example.com", "pw"),
        );
        // The account already has a server-side cart from a previous visit.
        backend
            .add_item(UserId::new(101), ProductId::new(42), 3)
            .await
            .unwrap();

        let (flow, cart) = flow(backend);
        let count = cart.cart_count();
        assert_eq!(*count.borrow(), 0);

        let session = flow
            .sign_in("alice@example.com", SecretString::new("pw".into()))
            .await
            .unwrap();

        assert_eq!(session.user_id, Some(UserId::new(101)));
        assert_eq!(*count.borrow(), 3);
    }

    #[tokio::test]
    async fn failed_sign_in_propagates_and_leaves_count_alone() {
        let backend = Arc::new(
            MockBackend::new().with_account(101, "Alice", "alice@example.com", "pw"),
        );
        let (flow, cart) = flow(backend);

        let err = flow
            .sign_in("alice@example.com", SecretString::new("wrong".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(*cart.cart_count().borrow(), 0);
    }
}
