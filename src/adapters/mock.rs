//! Mock storefront backend for tests and offline development.
//!
//! Implements all four API ports against in-process state, mimicking the
//! real backend's behavior: additive cart adds, server-side product
//! enrichment, duplicate-email registration replies delivered with a
//! success status, and JWTs carrying `userId`/`exp` claims.
//!
//! # Example
//!
//! ```ignore
//! let backend = Arc::new(
//!     MockBackend::new()
//!         .with_product(product(42, "Oat Bar", 3.5))
//!         .with_account(101, "Alice", "alice@example.com", "pw"),
//! );
//! let cart = backend.add_item(UserId::new(101), ProductId::new(42), 2).await?;
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::cart::Cart;
use crate::domain::catalog::Product;
use crate::domain::foundation::{OrderId, ProductId, Timestamp, UserId};
use crate::domain::order::Order;
use crate::ports::{
    ApiError, AuthApi, CartApi, LoginResponse, OrderApi, PlaceOrderRequest, ProductCatalog,
    RegistrationReply,
};

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    name: String,
    email: String,
    password: String,
}

/// In-memory stand-in for the storefront backend.
pub struct MockBackend {
    accounts: Mutex<Vec<Account>>,
    carts: Mutex<HashMap<i64, Cart>>,
    products: Mutex<HashMap<i64, Product>>,
    orders: Mutex<HashMap<i64, Order>>,
    next_order_id: Mutex<i64>,
    /// Lifetime baked into issued tokens; `None` issues non-expiring tokens.
    token_lifetime_secs: Option<i64>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(Vec::new()),
            carts: Mutex::new(HashMap::new()),
            products: Mutex::new(HashMap::new()),
            orders: Mutex::new(HashMap::new()),
            next_order_id: Mutex::new(1),
            token_lifetime_secs: Some(3600),
        }
    }

    /// Seeds a catalog product.
    pub fn with_product(self, product: Product) -> Self {
        self.products
            .lock()
            .expect("MockBackend: products lock poisoned")
            .insert(product.id.as_i64(), product);
        self
    }

    /// Seeds an account that can log in.
    pub fn with_account(
        self,
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.accounts
            .lock()
            .expect("MockBackend: accounts lock poisoned")
            .push(Account {
                id: UserId::new(id),
                name: name.into(),
                email: email.into(),
                password: password.into(),
            });
        self
    }

    /// Sets the lifetime of issued tokens.
    pub fn with_token_lifetime_secs(mut self, secs: i64) -> Self {
        self.token_lifetime_secs = Some(secs);
        self
    }

    /// Issues tokens without an `exp` claim.
    pub fn without_token_expiry(mut self) -> Self {
        self.token_lifetime_secs = None;
        self
    }

    /// The cart currently held for a user, for test assertions.
    pub fn cart_snapshot(&self, user_id: UserId) -> Option<Cart> {
        self.carts
            .lock()
            .expect("MockBackend: carts lock poisoned")
            .get(&user_id.as_i64())
            .cloned()
    }

    fn issue_token(&self, account: &Account) -> String {
        let mut claims = serde_json::json!({
            "userId": account.id.as_i64(),
            "name": account.name,
            "email": account.email,
        });
        if let Some(secs) = self.token_lifetime_secs {
            claims["exp"] =
                serde_json::json!(Timestamp::now().plus_secs(secs).as_unix_secs());
        }

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"mock-backend"),
        )
        .expect("MockBackend: token encoding cannot fail")
    }

    fn product(&self, product_id: ProductId) -> Option<Product> {
        self.products
            .lock()
            .expect("MockBackend: products lock poisoned")
            .get(&product_id.as_i64())
            .cloned()
    }

    fn with_cart<R>(&self, user_id: UserId, f: impl FnOnce(&mut Cart) -> R) -> R {
        let mut carts = self.carts.lock().expect("MockBackend: carts lock poisoned");
        let cart = carts
            .entry(user_id.as_i64())
            .or_insert_with(|| Cart::empty(user_id));
        f(cart)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthApi for MockBackend {
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError> {
        let accounts = self
            .accounts
            .lock()
            .expect("MockBackend: accounts lock poisoned");
        let account = accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password.expose_secret())
            .ok_or_else(|| ApiError::status(401, "Invalid credentials"))?;

        Ok(LoginResponse {
            access_token: self.issue_token(account),
            token_type: "Bearer".to_string(),
            expires_in_ms: self.token_lifetime_secs.map(|s| (s as u64) * 1000),
        })
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<RegistrationReply, ApiError> {
        let mut accounts = self
            .accounts
            .lock()
            .expect("MockBackend: accounts lock poisoned");

        // The real backend reports duplicates as a 200 with a plain message.
        if accounts.iter().any(|a| a.email.eq_ignore_ascii_case(email)) {
            return Ok(RegistrationReply::Text("Email already in use".to_string()));
        }

        let id = 1000 + accounts.len() as i64;
        accounts.push(Account {
            id: UserId::new(id),
            name: name.to_string(),
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        });

        Ok(RegistrationReply::Text("User registered".to_string()))
    }
}

#[async_trait]
impl CartApi for MockBackend {
    async fn fetch(&self, user_id: UserId) -> Result<Cart, ApiError> {
        Ok(self
            .cart_snapshot(user_id)
            .unwrap_or_else(|| Cart::empty(user_id)))
    }

    async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        let product = self
            .product(product_id)
            .ok_or_else(|| ApiError::status(404, "Product not found"))?;

        Ok(self.with_cart(user_id, |cart| {
            cart.add_line(product_id, product.name.clone(), quantity, product.price);
            cart.clone()
        }))
    }

    async fn update_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, ApiError> {
        Ok(self.with_cart(user_id, |cart| {
            cart.set_line_quantity(product_id, quantity);
            cart.clone()
        }))
    }

    async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<Cart, ApiError> {
        Ok(self.with_cart(user_id, |cart| {
            cart.remove_line(product_id);
            cart.clone()
        }))
    }

    async fn clear(&self, user_id: UserId) -> Result<(), ApiError> {
        self.carts
            .lock()
            .expect("MockBackend: carts lock poisoned")
            .remove(&user_id.as_i64());
        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for MockBackend {
    async fn search(&self, term: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let products = self
            .products
            .lock()
            .expect("MockBackend: products lock poisoned");
        let mut found: Vec<Product> = products
            .values()
            .filter(|p| match term {
                Some(t) => p.name.to_lowercase().contains(&t.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id.as_i64());
        Ok(found)
    }

    async fn get(&self, product_id: ProductId) -> Result<Product, ApiError> {
        self.product(product_id)
            .ok_or_else(|| ApiError::status(404, "Product not found"))
    }
}

#[async_trait]
impl OrderApi for MockBackend {
    async fn place(&self, request: PlaceOrderRequest) -> Result<Order, ApiError> {
        let cart = self
            .cart_snapshot(request.user_id)
            .unwrap_or_else(|| Cart::empty(request.user_id));
        if cart.is_empty() {
            return Err(ApiError::status(400, "Cart is empty"));
        }

        let id = {
            let mut next = self
                .next_order_id
                .lock()
                .expect("MockBackend: order id lock poisoned");
            let id = *next;
            *next += 1;
            OrderId::new(id)
        };

        let order = Order {
            id,
            user_id: Some(request.user_id),
            status: Some("PLACED".to_string()),
            payment_method: Some(request.payment_method),
            shipping_address: Some(request.shipping_address),
            items: cart.items.clone(),
            grand_total: Some(cart.grand_total),
        };

        self.orders
            .lock()
            .expect("MockBackend: orders lock poisoned")
            .insert(id.as_i64(), order.clone());
        Ok(order)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Order, ApiError> {
        self.orders
            .lock()
            .expect("MockBackend: orders lock poisoned")
            .get(&order_id.as_i64())
            .cloned()
            .ok_or_else(|| ApiError::status(404, "Order not found"))
    }
}
