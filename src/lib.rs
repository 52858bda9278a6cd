//! Shopfront client core - session and cart reconciliation.
//!
//! This crate owns the client side of the Shopfront storefront: the
//! authentication session (token, derived identity, expiry) and the shopping
//! cart for guest and signed-in users, unified behind one API with a live
//! item-count signal consumed by the UI shell.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
