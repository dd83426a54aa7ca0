//! Roast duel narrative compilation and publishing.
//!
//! Responsible for tallying a finished duel, grading its outcome, assembling
//! the human-readable narrative, and choosing which duel to publish.

pub mod application;
pub mod domain;
