//! Configuration types for Passage.
//!
//! Configuration can be loaded from a YAML file (`passage.yaml`) or built in
//! code. Every section has defaults, so an empty file is a valid config.
//!
//! ```yaml
//! key:
//!   secret_key_env: PASSAGE_SECRET_KEY
//!   secret_key_file: ./keys/secret.key
//! implicit_assertion:
//!   env: PASETO_NONCE
//!   random_len: 24
//! token:
//!   default_lifetime: 15m
//! ```

pub mod implicit;
pub mod key;
pub mod token;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use implicit::ImplicitAssertionConfig;
pub use key::KeyConfig;
pub use token::TokenConfig;

/// Complete Passage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PassageConfig {
    /// Where the symmetric key comes from.
    #[serde(default)]
    pub key: KeyConfig,

    /// Where the implicit assertion comes from.
    #[serde(default)]
    pub implicit_assertion: ImplicitAssertionConfig,

    /// Token issuance defaults.
    #[serde(default)]
    pub token: TokenConfig,
}

impl PassageConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PassageConfig::from_yaml_str("").unwrap();
        assert_eq!(config.implicit_assertion.env.as_deref(), Some("PASETO_NONCE"));
        assert_eq!(config.implicit_assertion.random_len, 24);
        assert_eq!(config.token.default_lifetime, "15m");
        assert!(config.key.secret_key_file.is_none());
    }

    #[test]
    fn test_partial_config() {
        let yaml = r#"
implicit_assertion:
  value: "service-a"
token:
  default_lifetime: 1h
"#;
        let config = PassageConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.implicit_assertion.value.as_deref(), Some("service-a"));
        assert_eq!(config.implicit_assertion.env.as_deref(), Some("PASETO_NONCE"));
        assert_eq!(
            config.token.default_lifetime().unwrap(),
            chrono::Duration::hours(1)
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key:\n  secret_key_env: MY_KEY").unwrap();

        let config = PassageConfig::load(file.path()).unwrap();
        assert_eq!(config.key.secret_key_env.as_deref(), Some("MY_KEY"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = PassageConfig::from_yaml_str("key: [unterminated");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
