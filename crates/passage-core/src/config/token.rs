//! Token issuance defaults.

use crate::duration::parse_duration;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Defaults applied when minting tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Lifetime used when the caller does not pass one (e.g. "15m", "24h").
    #[serde(default = "default_lifetime")]
    pub default_lifetime: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_lifetime: default_lifetime(),
        }
    }
}

impl TokenConfig {
    /// Parsed default lifetime.
    pub fn default_lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        parse_duration(&self.default_lifetime)
    }
}

fn default_lifetime() -> String {
    "15m".to_string()
}
