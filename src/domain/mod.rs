//! Domain layer - Core business logic and models.
//!
//! Ledger entries, the portfolio accountant, fees, token resolution and
//! venue payload mapping. No I/O here (hexagonal architecture inner ring);
//! everything is serializable and testable in isolation.

pub mod fees;
pub mod ledger;
pub mod portfolio;
pub mod request;
pub mod tokens;
pub mod trade;
pub mod venue_request;

// Re-export core types for convenience
pub use fees::FeeCalculator;
pub use ledger::Ledger;
pub use portfolio::Portfolio;
pub use request::{BridgeRequest, TradeRequest, ValidationError};
pub use tokens::TokenMap;
pub use trade::{
    BridgeTicket, LedgerEntry, Trade, TradeAction, TradeStatus, TradeTicket, Transfer,
};
pub use venue_request::{PayloadFields, VenueTradeRequest};
