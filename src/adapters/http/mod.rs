//! REST adapters for the storefront backend.

mod auth;
mod cart;
mod catalog;
mod client;
mod orders;

pub use auth::HttpAuthApi;
pub use cart::HttpCartApi;
pub use catalog::HttpProductCatalog;
pub use client::ApiClient;
pub use orders::HttpOrderApi;
