//! Generation application services.

pub mod coordinator;
pub mod synthesizer;
