//! Integration tests for the token lifecycle.
//!
//! Run with: cargo test --package passage-token --test lifecycle

use chrono::{Duration, Utc};
use passage_core::{ImplicitAssertionConfig, KeyConfig, PassageConfig};
use passage_token::{
    EntropySource, KeyContext, Maker, OsEntropy, PasetoMaker, SeededEntropy, TokenError,
};
use std::collections::HashSet;
use std::sync::Arc;

fn maker_with_implicit(implicit: &[u8]) -> PasetoMaker {
    let entropy: Arc<dyn EntropySource> = Arc::new(OsEntropy);
    let keys = KeyContext::generate(entropy.as_ref(), implicit.to_vec()).unwrap();
    PasetoMaker::new(keys, entropy)
}

/// Usernames survive a create/verify round trip.
#[test]
fn test_token_roundtrip() {
    let maker = maker_with_implicit(b"service-x");

    for username in ["testuser", "", "ünïcødé", "with spaces and \"quotes\""] {
        for duration in [Duration::seconds(1), Duration::minutes(1), Duration::days(30)] {
            let issued = maker.create_token(username, duration).unwrap();
            let claims = maker.verify_token(&issued.token).unwrap();
            assert_eq!(claims.username(), username);
            assert_eq!(claims, issued.claims);
        }
    }
}

/// Zero and negative lifetimes are rejected without producing a token.
#[test]
fn test_invalid_durations() {
    let maker = maker_with_implicit(b"service-x");

    assert_eq!(
        maker.create_token("alice", Duration::zero()).unwrap_err(),
        TokenError::DurationNotSet
    );
    assert_eq!(
        maker.create_token("alice", Duration::minutes(-1)).unwrap_err(),
        TokenError::DurationNegative
    );
    assert_eq!(
        maker
            .factory()
            .create_token_string("alice", Duration::milliseconds(-1))
            .unwrap_err(),
        TokenError::DurationNegative
    );
}

/// A token whose lifetime has run out verifies as expired, not invalid.
#[test]
fn test_short_lived_token_expires() {
    let maker = maker_with_implicit(b"service-x");

    let issued = maker.create_token("alice", Duration::milliseconds(50)).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(120));

    assert_eq!(maker.verify_token(&issued.token), Err(TokenError::ExpiredToken));
}

/// Appending to or truncating a token breaks authentication.
#[test]
fn test_tampered_token() {
    let maker = maker_with_implicit(b"service-x");
    let token = maker.create_token("alice", Duration::minutes(1)).unwrap().token;

    let appended = format!("{token}garbage");
    assert_eq!(maker.verify_token(&appended), Err(TokenError::InvalidToken));

    let truncated = &token[..token.len() - 1];
    assert_eq!(maker.verify_token(truncated), Err(TokenError::InvalidToken));

    // Flip one character in the middle of the body
    let mut bytes = token.clone().into_bytes();
    let middle = bytes.len() / 2;
    bytes[middle] = if bytes[middle] == b'A' { b'B' } else { b'A' };
    let flipped = String::from_utf8(bytes).unwrap();
    assert_eq!(maker.verify_token(&flipped), Err(TokenError::InvalidToken));
}

/// Arbitrary input is rejected, never a panic.
#[test]
fn test_garbage_input() {
    let maker = maker_with_implicit(b"service-x");

    for input in [
        "not-a-token",
        "",
        "v4.local.",
        "v4.local.AAAA",
        "v4.public.AAAA",
        "v2.local.AAAA",
        "v4.local.!!!!",
        "v4.local.AAAA.BBBB.CCCC",
    ] {
        assert_eq!(
            maker.verify_token(input),
            Err(TokenError::InvalidToken),
            "input {input:?}"
        );
    }
}

/// Identifiers never repeat.
#[test]
fn test_identifier_uniqueness() {
    let maker = maker_with_implicit(b"service-x");

    let ids: HashSet<_> = (0..1000)
        .map(|_| maker.create_token("alice", Duration::minutes(1)).unwrap().claims.id())
        .collect();
    assert_eq!(ids.len(), 1000);
}

/// Tokens do not verify under another key.
#[test]
fn test_cross_key_isolation() {
    let a = maker_with_implicit(b"service-x");
    let b = maker_with_implicit(b"service-x");

    let token = a.create_token("alice", Duration::minutes(1)).unwrap().token;
    assert!(a.verify_token(&token).is_ok());
    assert_eq!(b.verify_token(&token), Err(TokenError::InvalidToken));
}

/// Tokens do not verify under the same key with a different implicit assertion.
#[test]
fn test_cross_implicit_isolation() {
    let issuer = maker_with_implicit(b"service-x");
    let encoded = issuer.key_context().encoded_key();

    let same = PasetoMaker::new(
        KeyContext::from_encoded_key(&encoded, b"service-x".to_vec()).unwrap(),
        Arc::new(OsEntropy),
    );
    let other = PasetoMaker::new(
        KeyContext::from_encoded_key(&encoded, b"service-y".to_vec()).unwrap(),
        Arc::new(OsEntropy),
    );

    let token = issuer.create_token("alice", Duration::minutes(1)).unwrap().token;
    assert!(same.verify_token(&token).is_ok());
    assert_eq!(other.verify_token(&token), Err(TokenError::InvalidToken));
}

/// Timestamps are taken at issuance and the window equals the requested duration.
#[test]
fn test_timestamp_fidelity() {
    let maker = maker_with_implicit(b"service-x");
    let duration = Duration::minutes(15) + Duration::milliseconds(123);

    let before = Utc::now();
    let issued = maker.create_token("alice", duration).unwrap();
    let after = Utc::now();

    let claims = issued.claims;
    assert!(claims.issued_at() >= before && claims.issued_at() <= after);
    assert!((Utc::now() - claims.issued_at()) < Duration::seconds(1));
    assert_eq!(claims.expires_at() - claims.issued_at(), duration);

    let verified = maker.verify_token(&issued.token).unwrap();
    assert_eq!(verified.issued_at(), claims.issued_at());
    assert_eq!(verified.expires_at() - verified.issued_at(), duration);
}

/// One maker serves many threads at once.
#[test]
fn test_concurrent_create_and_verify() {
    let maker = Arc::new(maker_with_implicit(b"service-x"));

    let ids: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let maker = Arc::clone(&maker);
                scope.spawn(move || {
                    let username = format!("user-{worker}");
                    (0..50)
                        .map(|_| {
                            let issued = maker.create_token(&username, Duration::minutes(1)).unwrap();
                            let claims = maker.verify_token(&issued.token).unwrap();
                            assert_eq!(claims.username(), username);
                            claims.id()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 8 * 50);
}

/// A persisted key and shared implicit assertion let a second process verify.
#[test]
fn test_persisted_key_verifies_across_makers() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("secret.key");

    let config = PassageConfig {
        key: KeyConfig {
            secret_key_env: None,
            secret_key_file: Some(key_path.clone()),
        },
        implicit_assertion: ImplicitAssertionConfig::with_value("billing"),
        ..PassageConfig::default()
    };

    let issuer = PasetoMaker::from_config(&config, Arc::new(SeededEntropy::new(5))).unwrap();
    issuer.key_context().save_to_file(&key_path).unwrap();
    let token = issuer.create_token("dave", Duration::minutes(5)).unwrap().token;

    let verifier = PasetoMaker::from_config(&config, Arc::new(OsEntropy)).unwrap();
    assert_eq!(verifier.verify_token(&token).unwrap().username(), "dave");
}
