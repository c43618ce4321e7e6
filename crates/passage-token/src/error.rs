//! Error types for token operations.

use thiserror::Error;

/// Errors returned by token issuance and verification.
///
/// `ExpiredToken` and `InvalidToken` carry no detail on purpose: callers only
/// learn whether a token needs re-authentication or must be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Requested lifetime is zero.
    #[error("duration not set")]
    DurationNotSet,

    /// Requested lifetime is negative.
    #[error("duration cannot be negative")]
    DurationNegative,

    /// Requested lifetime pushes the expiry past the representable range.
    #[error("duration exceeds the supported timestamp range")]
    DurationOutOfRange,

    /// Token is authentic but its validity window has elapsed.
    #[error("token has expired")]
    ExpiredToken,

    /// Token is forged, corrupted, truncated, or was issued under another key
    /// or implicit assertion.
    #[error("token is invalid")]
    InvalidToken,

    /// Could not draw random bytes for the token identifier.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// The PASETO layer rejected well-formed claims.
    #[error("failed to encrypt token: {0}")]
    Encryption(String),
}

/// Errors that can occur while building a key context.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Secret key text is not valid base64url.
    #[error("failed to decode secret key: {0}")]
    InvalidKeyEncoding(String),

    /// Secret key has the wrong size.
    #[error("secret key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// PASETO layer rejected the key material.
    #[error("rejected key material: {0}")]
    Primitive(String),

    /// Could not draw random bytes for the key or implicit assertion.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// IO error (reading/writing keys).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The entropy source could not produce bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entropy source failed: {0}")]
pub struct EntropyError(pub String);
