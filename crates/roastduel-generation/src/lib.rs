//! Roast duel content generation.
//!
//! Responsible for turning outstanding turns into roast text, storing it by
//! content address, and committing the address back to the ledger.

pub mod application;
pub mod domain;
