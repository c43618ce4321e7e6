//! Token management commands.
//!
//! `passage token create` - Issue a token for a username.
//! `passage token verify` - Verify a token and print its claims.

use anyhow::Context;
use clap::Args;
use passage_core::{ImplicitAssertionConfig, PassageConfig, parse_duration};
use passage_token::{KeyContext, Maker, OsEntropy, PasetoMaker};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Key material shared by `create` and `verify`.
#[derive(Args, Debug, Clone, Default)]
pub struct KeyArgs {
    /// Secret key: a path to a key file or the base64url-encoded key itself.
    #[arg(long, env = "PASSAGE_SECRET_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Implicit assertion bound into the token. Must match between create and verify.
    #[arg(long, env = "PASETO_NONCE", hide_env_values = true)]
    pub implicit: Option<String>,
}

/// Resolve the key context from flags first, then configuration.
///
/// No random implicit assertion fallback here: tokens must verify in later
/// invocations.
///
/// The key string can be:
/// - A path to a file containing an encoded key
/// - The encoded key directly (e.g., from PASSAGE_SECRET_KEY env var)
fn resolve_key_context(args: &KeyArgs, config: &PassageConfig) -> anyhow::Result<KeyContext> {
    let implicit_config = match &args.implicit {
        Some(value) => ImplicitAssertionConfig::with_value(value.clone()),
        None => config.implicit_assertion.clone(),
    };
    let implicit = implicit_config.resolve().context(
        "Implicit assertion not provided. Either pass --implicit, set PASETO_NONCE, \
         or configure implicit_assertion.value",
    )?;

    let key_str = match &args.key {
        Some(key) => key.clone(),
        None => config.key.resolve_secret_key()?.context(
            "Secret key not provided. Either pass --key <path|key>, set PASSAGE_SECRET_KEY, \
             or configure key.secret_key_file",
        )?,
    };

    // If it looks like a file path and the file exists, load from file
    let path = Path::new(&key_str);
    if path.exists() {
        return KeyContext::load_from_file(path, implicit)
            .with_context(|| format!("Failed to load secret key from file: {}", path.display()));
    }

    // Otherwise, treat it as an encoded key
    KeyContext::from_encoded_key(&key_str, implicit)
        .context("Failed to parse secret key. Expected a base64url-encoded 32-byte key")
}

/// Read a token from a file if the argument names one.
fn read_token_arg(token: String) -> anyhow::Result<String> {
    if Path::new(&token).exists() {
        Ok(fs::read_to_string(&token)?.trim().to_string())
    } else {
        Ok(token)
    }
}

/// Issue a new token.
pub fn create(
    config: &PassageConfig,
    keys: &KeyArgs,
    username: String,
    expires: Option<String>,
    output: Option<PathBuf>,
    as_json: bool,
) -> anyhow::Result<()> {
    let context = resolve_key_context(keys, config)?;
    let duration = match &expires {
        Some(expires) => parse_duration(expires)?,
        None => config.token.default_lifetime()?,
    };

    let maker = PasetoMaker::new(context, Arc::new(OsEntropy));
    let issued = maker
        .create_token(&username, duration)
        .context("Failed to create token")?;

    if let Some(output_path) = output {
        fs::write(&output_path, &issued.token)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  ID: {}", issued.claims.id());
        println!("  Username: {}", issued.claims.username());
        println!("  Issued at: {}", issued.claims.issued_at().to_rfc3339());
        println!("  Expires at: {}", issued.claims.expires_at().to_rfc3339());
    } else if as_json {
        let value = json!({ "token": issued.token, "claims": issued.claims });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", issued.token);
    }

    Ok(())
}

/// Verify a token.
pub fn verify(
    config: &PassageConfig,
    keys: &KeyArgs,
    token: String,
    as_json: bool,
) -> anyhow::Result<()> {
    let context = resolve_key_context(keys, config)?;
    let token_str = read_token_arg(token)?;

    let maker = PasetoMaker::new(context, Arc::new(OsEntropy));
    let claims = maker
        .verify_token(&token_str)
        .context("Token verification failed")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&claims)?);
    } else {
        println!("✔ Token is valid");
        println!();
        println!("Token Details:");
        println!("  ID: {}", claims.id());
        println!("  Username: {}", claims.username());
        println!("  Issued at: {}", claims.issued_at().to_rfc3339());
        println!("  Expires at: {}", claims.expires_at().to_rfc3339());
        println!(
            "  Remaining: {}s",
            claims.time_until_expiration().num_seconds()
        );
    }

    Ok(())
}
