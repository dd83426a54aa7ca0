//! Domain layer for the narrative context.

pub mod narrative;
pub mod outcome;
pub mod selection;
pub mod tally;
