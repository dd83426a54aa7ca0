//! Shared domain model and ports for the roast duel pipeline.
//!
//! This crate defines the duel model read from the authoritative ledger, the
//! error taxonomy, and the traits adapters implement. It contains no
//! infrastructure code.

pub mod clock;
pub mod content;
pub mod duel;
pub mod error;
pub mod figures;
pub mod ports;
pub mod retry;
