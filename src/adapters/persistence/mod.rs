//! Persistence Adapters - JSON File Storage
//!
//! Implements the `LedgerStore` port with a single atomically-rewritten
//! JSON document (plus an in-memory variant for tests), and the
//! `TokenMapSource` port with a read-only JSON mapping file.
//! No database dependency.

pub mod json_store;
pub mod memory;
pub mod token_map;

pub use json_store::JsonFileStore;
pub use memory::InMemoryStore;
pub use token_map::TokenMapFile;
