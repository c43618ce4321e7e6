//! Symmetric key source configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for locating the PASETO secret key.
///
/// When neither source yields a key, a fresh one is generated per process and
/// tokens only verify within that process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeyConfig {
    /// Environment variable containing the secret key (base64url).
    #[serde(default)]
    pub secret_key_env: Option<String>,

    /// Path to the secret key file.
    #[serde(default)]
    pub secret_key_file: Option<PathBuf>,
}

impl KeyConfig {
    /// Resolve the encoded secret key from environment or file.
    pub fn resolve_secret_key(&self) -> Result<Option<String>, std::io::Error> {
        self.resolve_secret_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`resolve_secret_key`](Self::resolve_secret_key) with an
    /// explicit environment lookup.
    pub fn resolve_secret_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<String>, std::io::Error> {
        // Try environment variable first
        if let Some(env_var) = &self.secret_key_env {
            if let Some(key) = lookup(env_var.as_str()) {
                if !key.trim().is_empty() {
                    return Ok(Some(key.trim().to_string()));
                }
            }
        }

        // Try file path
        if let Some(path) = &self.secret_key_file {
            if path.exists() {
                let key = std::fs::read_to_string(path)?;
                return Ok(Some(key.trim().to_string()));
            }
        }

        Ok(None)
    }

    /// The configured key file, if it is set but does not exist.
    pub fn missing_key_file(&self) -> Option<&Path> {
        self.secret_key_file
            .as_deref()
            .filter(|path| !path.exists())
    }
}
