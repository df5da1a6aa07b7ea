//! Shared domain types for the cinema rental and film catalog applications.
//!
//! Aggregates, validation rules and variant settings live here; storage and
//! editing sessions are built on top of them in the `backend` and `frontend`
//! crates.

pub mod domain;
pub mod shared;
