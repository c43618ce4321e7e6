//! The `Maker` interface: one object that both issues and verifies tokens.

use crate::claims::Claims;
use crate::entropy::{EntropySource, OsEntropy};
use crate::error::{KeyError, TokenError};
use crate::keys::{KeyContext, resolve_implicit_assertion};
use crate::token::{IssuedToken, TokenFactory, TokenValidator};
use chrono::Duration;
use passage_core::{ImplicitAssertionConfig, PassageConfig};
use std::sync::Arc;

/// Issues and verifies tokens.
pub trait Maker: Send + Sync {
    /// Create a token for `username` valid for `duration`.
    fn create_token(&self, username: &str, duration: Duration) -> Result<IssuedToken, TokenError>;

    /// Check a presented token and return its claims.
    fn verify_token(&self, token: &str) -> Result<Claims, TokenError>;
}

/// PASETO v4.local implementation of [`Maker`].
///
/// Factory and validator share a single [`KeyContext`], so every token this
/// maker issues verifies with it and with nothing else.
#[derive(Clone)]
pub struct PasetoMaker {
    keys: Arc<KeyContext>,
    factory: TokenFactory,
    validator: TokenValidator,
}

impl PasetoMaker {
    /// Create a maker over an existing key context.
    pub fn new(keys: KeyContext, entropy: Arc<dyn EntropySource>) -> Self {
        let keys = Arc::new(keys);
        Self {
            factory: TokenFactory::new(keys.clone(), entropy),
            validator: TokenValidator::new(keys.clone()),
            keys,
        }
    }

    /// Create a maker with a fresh key, OS entropy, and the implicit assertion
    /// taken from `PASETO_NONCE` (random if unset).
    pub fn generate() -> Result<Self, KeyError> {
        let entropy: Arc<dyn EntropySource> = Arc::new(OsEntropy);
        let implicit =
            resolve_implicit_assertion(&ImplicitAssertionConfig::default(), entropy.as_ref())?;
        let keys = KeyContext::generate(entropy.as_ref(), implicit)?;
        Ok(Self::new(keys, entropy))
    }

    /// Create a maker from configuration.
    pub fn from_config(
        config: &PassageConfig,
        entropy: Arc<dyn EntropySource>,
    ) -> Result<Self, KeyError> {
        let keys = KeyContext::from_config(&config.key, &config.implicit_assertion, entropy.as_ref())?;
        Ok(Self::new(keys, entropy))
    }

    /// The issuing half.
    pub fn factory(&self) -> &TokenFactory {
        &self.factory
    }

    /// The verifying half.
    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    /// The shared key context.
    pub fn key_context(&self) -> &KeyContext {
        &self.keys
    }
}

impl Maker for PasetoMaker {
    fn create_token(&self, username: &str, duration: Duration) -> Result<IssuedToken, TokenError> {
        self.factory.create_token(username, duration)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.validator.verify_token(token)
    }
}
