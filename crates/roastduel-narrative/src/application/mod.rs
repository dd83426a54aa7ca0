//! Application layer for the narrative context.

pub mod compiler;
pub mod publisher;
