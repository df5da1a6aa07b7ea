pub mod aggregate;

pub use aggregate::{Cinema, CinemaChange, CinemaField};
