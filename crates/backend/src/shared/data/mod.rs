//! In-memory collections and their file-backed stores.
//!
//! - `storage`: one JSON document with all four collections (cinema rental)
//! - `flat_file`: two `|`-separated text files (film catalog console)

pub mod collection;
pub mod error;
pub mod flat_file;
pub mod repository;
pub mod storage;

pub use collection::Collection;
pub use error::StoreError;
pub use flat_file::DataManager;
pub use repository::{DeleteOutcome, Repository};
pub use storage::DataStorage;
