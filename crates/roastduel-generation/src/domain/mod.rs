//! Generation domain: severity tiers, prompts and request planning.

pub mod prompt;
pub mod requests;
pub mod severity;
