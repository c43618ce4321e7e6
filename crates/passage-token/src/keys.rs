//! Symmetric key context for PASETO v4.local tokens.

use crate::entropy::EntropySource;
use crate::error::KeyError;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use passage_core::{ImplicitAssertionConfig, KeyConfig};
use pasetors::version4::V4;
use pasetors::keys::SymmetricKey;
use std::fmt;
use std::io::Write as _;
use std::path::Path;
use tracing::{debug, warn};

/// Size of a v4.local secret key in bytes.
pub const KEY_LEN: usize = 32;

/// A secret key plus the implicit assertion bound into every token.
///
/// Read-only after construction. Share it behind an `Arc` between the factory
/// and validator that must agree on it.
pub struct KeyContext {
    key: SymmetricKey<V4>,
    implicit: Vec<u8>,
}

impl KeyContext {
    /// Generate a fresh random key.
    pub fn generate(entropy: &dyn EntropySource, implicit: Vec<u8>) -> Result<Self, KeyError> {
        let mut bytes = [0u8; KEY_LEN];
        entropy.fill_bytes(&mut bytes)?;
        Self::from_key_bytes(&bytes, implicit)
    }

    /// Build a context from raw key bytes.
    pub fn from_key_bytes(bytes: &[u8], implicit: Vec<u8>) -> Result<Self, KeyError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidKeyLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        let key = SymmetricKey::<V4>::from(bytes)
            .map_err(|e| KeyError::Primitive(format!("{e:?}")))?;
        Ok(Self { key, implicit })
    }

    /// Build a context from a base64url (unpadded) encoded key.
    pub fn from_encoded_key(encoded: &str, implicit: Vec<u8>) -> Result<Self, KeyError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|e| KeyError::InvalidKeyEncoding(e.to_string()))?;
        Self::from_key_bytes(&bytes, implicit)
    }

    /// Load the key from a file holding its encoded form.
    pub fn load_from_file(path: &Path, implicit: Vec<u8>) -> Result<Self, KeyError> {
        let encoded = std::fs::read_to_string(path)?;
        Self::from_encoded_key(&encoded, implicit)
    }

    /// Resolve key and implicit assertion from configuration.
    ///
    /// Falls back to a freshly generated key and random implicit bytes when
    /// the configuration names no source. Everything is resolved here, once.
    pub fn from_config(
        key: &KeyConfig,
        implicit: &ImplicitAssertionConfig,
        entropy: &dyn EntropySource,
    ) -> Result<Self, KeyError> {
        let implicit = resolve_implicit_assertion(implicit, entropy)?;

        match key.resolve_secret_key()? {
            Some(encoded) => {
                debug!("Using configured secret key");
                Self::from_encoded_key(&encoded, implicit)
            }
            None => {
                if let Some(path) = key.missing_key_file() {
                    warn!(
                        path = %path.display(),
                        "Configured secret key file does not exist"
                    );
                }
                debug!(
                    entropy = entropy.source_id(),
                    "No secret key configured, generating one for this process"
                );
                Self::generate(entropy, implicit)
            }
        }
    }

    /// The key in its encoded (base64url) form, for persisting it.
    pub fn encoded_key(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.key.as_bytes())
    }

    /// Save the encoded key to a file readable only by its owner.
    pub fn save_to_file(&self, path: &Path) -> Result<(), KeyError> {
        write_secret_file(path, &self.encoded_key())?;
        Ok(())
    }

    /// Non-secret context authenticated with every token.
    pub fn implicit_assertion(&self) -> &[u8] {
        &self.implicit
    }

    pub(crate) fn key(&self) -> &SymmetricKey<V4> {
        &self.key
    }
}

impl fmt::Debug for KeyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyContext")
            .field("key", &"<redacted>")
            .field("implicit_len", &self.implicit.len())
            .finish()
    }
}

/// Write secret material to `path`, owner read/write only on unix.
pub fn write_secret_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // mode() only applies when the file is created
        let mut file = options.open(path)?;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(contents.as_bytes())?;
    }
    #[cfg(not(unix))]
    {
        let mut file = options.open(path)?;
        file.write_all(contents.as_bytes())?;
    }
    Ok(())
}

/// Generate a new encoded secret key without building a context.
pub fn generate_encoded_key(entropy: &dyn EntropySource) -> Result<String, KeyError> {
    Ok(KeyContext::generate(entropy, Vec::new())?.encoded_key())
}

/// Resolve the implicit assertion, generating random bytes if none is configured.
pub fn resolve_implicit_assertion(
    config: &ImplicitAssertionConfig,
    entropy: &dyn EntropySource,
) -> Result<Vec<u8>, KeyError> {
    if let Some(bytes) = config.resolve() {
        debug!(len = bytes.len(), "Using configured implicit assertion");
        return Ok(bytes);
    }

    warn!(
        env = config.env.as_deref().unwrap_or("<none>"),
        "No implicit assertion configured, generating a random one; tokens will not verify in other processes"
    );
    let mut bytes = vec![0u8; config.random_len];
    entropy.fill_bytes(&mut bytes)?;
    Ok(bytes)
}
