pub mod aggregate;

pub use aggregate::{Rental, RentalChange, RentalField};
