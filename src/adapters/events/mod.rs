//! Event bus adapters.

mod in_process;

pub use in_process::InProcessSessionBus;
