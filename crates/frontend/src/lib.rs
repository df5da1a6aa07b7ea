//! Record forms, the cinema rental application state and the film catalog console.

pub mod app;
pub mod console;
pub mod domain;
pub mod shared;
