//! Adapters - concrete implementations of the ports.

pub mod events;
pub mod http;
pub mod mock;
pub mod storage;
