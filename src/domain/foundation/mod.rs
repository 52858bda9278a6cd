//! Foundational value objects shared across the domain.

mod ids;
mod timestamp;

pub use ids::{OrderId, ProductId, UserId};
pub use timestamp::Timestamp;
