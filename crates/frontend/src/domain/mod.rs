pub mod a001_cinema;
pub mod a002_supplier;
pub mod a003_film;
pub mod a004_rental;
