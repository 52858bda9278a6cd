//! Ports - the traits this core talks through.
//!
//! Adapters implement these against the real REST backend, the durable local
//! store, and the in-process event bus; tests substitute mocks.

mod api;
mod auth_api;
mod cart_api;
mod local_store;
mod order_api;
mod product_catalog;
mod session_events;

pub use api::ApiError;
pub use auth_api::{AuthApi, LoginResponse, RegistrationReply};
pub use cart_api::CartApi;
pub use local_store::{keys as store_keys, LocalStore, LocalStoreError};
pub use order_api::{OrderApi, PlaceOrderRequest};
pub use product_catalog::ProductCatalog;
pub use session_events::{SessionChanged, SessionChangedHandler, SessionEventBus};
