//! # passage-token
//!
//! Short-lived, symmetrically encrypted session tokens.
//!
//! This crate provides functionality for:
//! - Holding a PASETO v4.local key together with its implicit assertion
//! - Issuing tokens that bind a username to a unique id and a validity window
//! - Verifying tokens and telling "expired" apart from "invalid"
//!
//! ## Token contents
//!
//! | Claim | Meaning |
//! |-------|---------|
//! | `jti` | random v4 UUID, fresh per token |
//! | `username` | caller-supplied identity |
//! | `iat` / `nbf` | issuance time |
//! | `exp` | issuance time plus the requested lifetime |
//!
//! The implicit assertion is authenticated with every token but is not part
//! of it, so a token only verifies under the exact key and implicit bytes it
//! was issued with.
//!
//! ```no_run
//! use passage_token::{Maker, PasetoMaker, TokenError};
//!
//! let maker = PasetoMaker::generate()?;
//! let issued = maker.create_token("alice", chrono::Duration::minutes(15)).unwrap();
//! let claims = maker.verify_token(&issued.token).unwrap();
//! assert_eq!(claims.username(), "alice");
//! assert_eq!(maker.verify_token("garbage"), Err(TokenError::InvalidToken));
//! # Ok::<(), passage_token::KeyError>(())
//! ```

pub mod claims;
pub mod entropy;
pub mod error;
pub mod keys;
pub mod maker;
pub mod token;

pub use claims::{Claims, validate_duration};
pub use entropy::{EntropySource, OsEntropy, SeededEntropy};
pub use error::{EntropyError, KeyError, TokenError};
pub use keys::KeyContext;
pub use maker::{Maker, PasetoMaker};
pub use token::{IssuedToken, TokenFactory, TokenValidator};
