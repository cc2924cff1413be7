//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement the
//! dashboard's workflows.
//!
//! Use cases:
//! - `TradeOrchestrator`: trade recording, venue execution with local
//!   fallback, dry runs, bridge transfers, balance and price reads

pub mod trade_orchestrator;

pub use trade_orchestrator::{Balances, TradeError, TradeOrchestrator, TradeOutcome};
