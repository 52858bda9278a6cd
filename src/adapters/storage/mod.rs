//! Durable local store adapters.

mod file;
mod in_memory;

pub use file::FileLocalStore;
pub use in_memory::InMemoryLocalStore;
