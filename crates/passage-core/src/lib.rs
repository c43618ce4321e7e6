//! Core configuration types for Passage.
//!
//! Everything here is plain data: the token engine in `passage-token` and the
//! `passage` CLI read these structures once at startup and never consult the
//! environment again afterwards.

pub mod config;
pub mod duration;
pub mod error;

pub use config::{ImplicitAssertionConfig, KeyConfig, PassageConfig, TokenConfig};
pub use duration::parse_duration;
pub use error::ConfigError;
