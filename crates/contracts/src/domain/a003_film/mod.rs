pub mod aggregate;

pub use aggregate::{Film, FilmChange, FilmField};
