//! Token claims and lifetime rules.

use crate::error::TokenError;
use chrono::{DateTime, Datelike, Duration, SecondsFormat, Utc};
use pasetors::claims::Claims as PasetoClaims;
use serde::Serialize;
use uuid::Uuid;

/// Custom claim carrying the identity.
pub const USERNAME_CLAIM: &str = "username";

/// Last year an RFC 3339 timestamp can carry (four-digit years only).
const MAX_TIMESTAMP_YEAR: i32 = 9999;

const ID_CLAIM: &str = "jti";
const ISSUED_AT_CLAIM: &str = "iat";
const NOT_BEFORE_CLAIM: &str = "nbf";
pub(crate) const EXPIRATION_CLAIM: &str = "exp";

/// Claims carried by a token.
///
/// Only the token factory builds these; verification rebuilds them from a
/// decrypted token. Timestamps keep nanosecond precision through a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    id: Uuid,
    username: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Check a requested token lifetime.
pub fn validate_duration(duration: Duration) -> Result<(), TokenError> {
    if duration.is_zero() {
        return Err(TokenError::DurationNotSet);
    }
    if duration < Duration::zero() {
        return Err(TokenError::DurationNegative);
    }
    Ok(())
}

impl Claims {
    /// Assemble claims issued at `now` and valid for `duration`.
    ///
    /// Does not validate `duration`; the factory does that first.
    pub(crate) fn issue(
        id: Uuid,
        username: &str,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = now
            .checked_add_signed(duration)
            .filter(|expires_at| expires_at.year() <= MAX_TIMESTAMP_YEAR)
            .ok_or(TokenError::DurationOutOfRange)?;

        Ok(Self {
            id,
            username: username.to_string(),
            issued_at: now,
            expires_at,
        })
    }

    /// Unique token identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identity the token was issued to.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// When the token was issued.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the token stops verifying.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Get time until expiration (negative once expired).
    pub fn time_until_expiration(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    /// Fill a PASETO claims container.
    pub(crate) fn to_paseto(&self) -> Result<PasetoClaims, TokenError> {
        let issued_at = format_timestamp(self.issued_at);

        let mut claims = PasetoClaims::new().map_err(encryption_error)?;
        claims
            .token_identifier(&self.id.to_string())
            .map_err(encryption_error)?;
        claims.issued_at(&issued_at).map_err(encryption_error)?;
        claims.not_before(&issued_at).map_err(encryption_error)?;
        claims
            .expiration(&format_timestamp(self.expires_at))
            .map_err(encryption_error)?;
        claims
            .add_additional(USERNAME_CLAIM, self.username.clone())
            .map_err(encryption_error)?;

        Ok(claims)
    }

    /// Rebuild claims from a decrypted PASETO claims container.
    ///
    /// A missing or ill-shaped field means the token is treated as forged.
    pub(crate) fn from_paseto(claims: &PasetoClaims) -> Result<Self, TokenError> {
        let id = string_claim(claims, ID_CLAIM)?
            .parse::<Uuid>()
            .map_err(|_| TokenError::InvalidToken)?;

        Ok(Self {
            id,
            username: string_claim(claims, USERNAME_CLAIM)?.to_string(),
            issued_at: timestamp_claim(claims, ISSUED_AT_CLAIM)?,
            expires_at: timestamp_claim(claims, EXPIRATION_CLAIM)?,
        })
    }
}

pub(crate) fn timestamp_claim(
    claims: &PasetoClaims,
    name: &str,
) -> Result<DateTime<Utc>, TokenError> {
    let raw = string_claim(claims, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| TokenError::InvalidToken)
}

fn string_claim<'a>(claims: &'a PasetoClaims, name: &str) -> Result<&'a str, TokenError> {
    claims
        .get_claim(name)
        .and_then(|value| value.as_str())
        .ok_or(TokenError::InvalidToken)
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn encryption_error(err: pasetors::errors::Error) -> TokenError {
    TokenError::Encryption(format!("{err:?}"))
}
