//! CLI command implementations for Passage.

pub mod keys;
pub mod token;
