//! Token creation and verification.

use crate::claims::{self, Claims, EXPIRATION_CLAIM, validate_duration};
use crate::entropy::EntropySource;
use crate::error::TokenError;
use crate::keys::KeyContext;
use chrono::{DateTime, Duration, Utc};
use pasetors::claims::Claims as PasetoClaims;
use pasetors::token::UntrustedToken;
use pasetors::version4::{LocalToken, V4};
use pasetors::{Local, local};
use std::sync::Arc;
use tracing::debug;
use uuid::{Builder, Uuid};

/// A freshly minted token together with the claims inside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The encrypted token string (`v4.local.` prefix).
    pub token: String,
    /// The claims sealed into `token`.
    pub claims: Claims,
}

/// Builder for encrypted tokens.
#[derive(Clone)]
pub struct TokenFactory {
    keys: Arc<KeyContext>,
    entropy: Arc<dyn EntropySource>,
}

impl TokenFactory {
    /// Create a new token factory over the given key context.
    pub fn new(keys: Arc<KeyContext>, entropy: Arc<dyn EntropySource>) -> Self {
        Self { keys, entropy }
    }

    /// Mint a token for `username` valid for `duration`.
    ///
    /// The duration is checked before any randomness is drawn or any
    /// encryption attempted.
    pub fn create_token(&self, username: &str, duration: Duration) -> Result<IssuedToken, TokenError> {
        validate_duration(duration)?;
        self.issue(username, duration)
    }

    /// Same as [`create_token`](Self::create_token), returning only the token string.
    pub fn create_token_string(&self, username: &str, duration: Duration) -> Result<String, TokenError> {
        Ok(self.create_token(username, duration)?.token)
    }

    fn issue(&self, username: &str, duration: Duration) -> Result<IssuedToken, TokenError> {
        let id = self.new_token_id()?;
        let claims = Claims::issue(id, username, Utc::now(), duration)?;
        let token = self.seal(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    fn new_token_id(&self) -> Result<Uuid, TokenError> {
        let mut bytes = [0u8; 16];
        self.entropy.fill_bytes(&mut bytes)?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }

    fn seal(&self, claims: &Claims) -> Result<String, TokenError> {
        let container = claims.to_paseto()?;
        local::encrypt(
            self.keys.key(),
            &container,
            None,
            Some(self.keys.implicit_assertion()),
        )
        .map_err(|e| TokenError::Encryption(format!("{e:?}")))
    }
}

/// Verifier for encrypted tokens.
#[derive(Clone)]
pub struct TokenValidator {
    keys: Arc<KeyContext>,
}

impl TokenValidator {
    /// Create a new token validator over the given key context.
    pub fn new(keys: Arc<KeyContext>) -> Self {
        Self { keys }
    }

    /// Verify a token and extract its claims.
    ///
    /// Returns `ExpiredToken` for an authentic token past its expiry and
    /// `InvalidToken` for everything else that is wrong with it.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let untrusted = UntrustedToken::<Local, V4>::try_from(token)
            .map_err(|_| rejected("parse", TokenError::InvalidToken))?;

        let trusted = LocalToken::decrypt(
            self.keys.key(),
            &untrusted,
            None,
            Some(self.keys.implicit_assertion()),
        )
        .map_err(|_| rejected("decrypt", TokenError::InvalidToken))?;

        let container = PasetoClaims::from_string(trusted.payload())
            .map_err(|_| rejected("payload", TokenError::InvalidToken))?;

        // An authentic token past `exp` is expired whatever its other claims hold.
        let expires_at = claims::timestamp_claim(&container, EXPIRATION_CLAIM)
            .map_err(|e| rejected("expiry", e))?;
        if now > expires_at {
            return Err(rejected("expiry", TokenError::ExpiredToken));
        }

        Claims::from_paseto(&container).map_err(|e| rejected("claims", e))
    }
}

fn rejected(stage: &'static str, error: TokenError) -> TokenError {
    debug!(stage, error = %error, "Token rejected");
    error
}
