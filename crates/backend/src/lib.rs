//! Storage, configuration and logging for the cinema rental core.

pub mod shared;
pub mod system;
