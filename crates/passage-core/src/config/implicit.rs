//! Implicit assertion configuration.
//!
//! The implicit assertion is non-secret context (for example "tokens for
//! service X") that is authenticated with every token but never stored in it.
//! Issuer and verifier must agree on it byte for byte.

use serde::{Deserialize, Serialize};

/// Environment variable consulted by default.
pub const DEFAULT_IMPLICIT_ENV: &str = "PASETO_NONCE";

/// Length of the random implicit assertion generated when nothing is configured.
pub const DEFAULT_RANDOM_LEN: usize = 24;

/// Configuration for the implicit assertion bound into every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplicitAssertionConfig {
    /// Environment variable holding the implicit assertion.
    #[serde(default = "default_env")]
    pub env: Option<String>,

    /// Inline implicit assertion. Wins over the environment.
    #[serde(default)]
    pub value: Option<String>,

    /// Number of random bytes to generate when no value is configured.
    #[serde(default = "default_random_len")]
    pub random_len: usize,
}

impl Default for ImplicitAssertionConfig {
    fn default() -> Self {
        Self {
            env: default_env(),
            value: None,
            random_len: default_random_len(),
        }
    }
}

impl ImplicitAssertionConfig {
    /// Configuration with a fixed inline value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Resolve the configured implicit assertion bytes.
    ///
    /// Returns `None` when the caller must fall back to random bytes.
    pub fn resolve(&self) -> Option<Vec<u8>> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve`](Self::resolve) with an explicit environment lookup.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<Vec<u8>> {
        if let Some(value) = &self.value {
            return Some(value.clone().into_bytes());
        }

        // An empty variable counts as unset
        self.env
            .as_deref()
            .and_then(lookup)
            .filter(|value| !value.is_empty())
            .map(String::into_bytes)
    }
}

fn default_env() -> Option<String> {
    Some(DEFAULT_IMPLICIT_ENV.to_string())
}

fn default_random_len() -> usize {
    DEFAULT_RANDOM_LEN
}
