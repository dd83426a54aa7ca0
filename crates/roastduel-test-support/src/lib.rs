//! Shared in-memory adapters and fixtures for roast duel pipeline tests.

mod clock;
mod fixtures;
mod generator;
mod ledger;
mod sink;
mod store;

pub use clock::FixedClock;
pub use fixtures::{duel, duel_with_content, participant};
pub use generator::{FnGenerator, ScriptedGenerator};
pub use ledger::{FailingLedger, InMemoryLedger};
pub use sink::{FailingSink, RecordingSink};
pub use store::InMemoryContentStore;
