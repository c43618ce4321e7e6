//! Key management commands.
//!
//! `passage keys generate` - Generate a new v4.local secret key.

use passage_token::OsEntropy;
use passage_token::keys::{generate_encoded_key, write_secret_file};
use std::fs;
use std::path::PathBuf;

/// File name used when writing a key into a directory.
pub const SECRET_KEY_FILE: &str = "secret.key";

/// Generate a new secret key.
pub fn generate(output: Option<PathBuf>) -> anyhow::Result<()> {
    let encoded = generate_encoded_key(&OsEntropy)?;

    if let Some(output_dir) = output {
        // Create output directory if it doesn't exist
        fs::create_dir_all(&output_dir)?;

        let secret_path = output_dir.join(SECRET_KEY_FILE);
        write_secret_file(&secret_path, &encoded)?;

        println!("✔ Generated secret key: {}", secret_path.display());
        println!();
        println!("⚠️  Keep this key secure! Never commit it to version control.");
        println!();
        println!("Set as environment variable:");
        println!("  export PASSAGE_SECRET_KEY=$(cat {})", secret_path.display());
    } else {
        println!("{encoded}");
    }

    Ok(())
}
