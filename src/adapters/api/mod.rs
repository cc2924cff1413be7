//! Recall Venue API Adapter
//!
//! Implements the HTTP client for the optional Recall trading API:
//! balances, quotes, trade execution and prices. Requests arrive already
//! mapped into the venue's field names by the use-case layer.
//!
//! Sub-modules:
//! - `client`: reqwest client with timeouts, auth and transport fallback

pub mod client;

pub use client::{RecallClient, RecallClientConfig};
