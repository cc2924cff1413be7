//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TradingVenue`: Remote quote/execute/balance/price calls
//! - `LedgerStore`: Ledger persistence (single JSON document)
//! - `TokenMapSource`: Ticker → venue identifier mapping

pub mod execution;
pub mod repository;
pub mod token_source;

pub use execution::{ExecutionResult, Quote, TradingVenue, VenueError};
pub use repository::{LedgerStore, StoreError};
pub use token_source::TokenMapSource;
