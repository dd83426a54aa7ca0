//! HTTP adapters for the roast duel ports.
//!
//! Every adapter maps transport failures, rate limits and server errors to
//! transient errors, and every other non-success status to a permanent one,
//! so callers can retry on [`ErrorKind`](roastduel_core::error::ErrorKind)
//! alone.

pub mod content;
pub mod generator;
pub mod ledger;
mod status;

pub use content::GatewayContentStore;
pub use generator::OpenAiGenerator;
pub use ledger::HttpDuelLedger;
