use anyhow::Context;
use clap::{Parser, Subcommand};
use passage_core::PassageConfig;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::token::KeyArgs;

#[derive(Parser, Debug)]
#[command(name = "passage", version, about = "Issue and verify PASETO session tokens")]
struct Cli {
    /// Path to a passage.yaml configuration file.
    #[arg(long, global = true, env = "PASSAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Secret key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Token issuance and verification
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new secret key. Prints it unless --output is given.
    Generate {
        /// Directory to write secret.key into
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a token for a username
    Create {
        /// Identity to bind into the token
        #[arg(long)]
        username: String,

        /// Token lifetime, e.g. "15m", "1h30m", "7d". Defaults to token.default_lifetime.
        #[arg(long)]
        expires: Option<String>,

        #[command(flatten)]
        keys: KeyArgs,

        /// Write the token to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print token and claims as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Verify a token (string or path to a file holding one)
    Verify {
        token: String,

        #[command(flatten)]
        keys: KeyArgs,

        /// Print claims as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => PassageConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PassageConfig::default(),
    };
    debug!(config = ?cli.config, "Configuration loaded");

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { output } => commands::keys::generate(output),
        },
        Command::Token { cmd } => match cmd {
            TokenCommand::Create {
                username,
                expires,
                keys,
                output,
                json,
            } => commands::token::create(&config, &keys, username, expires, output, json),
            TokenCommand::Verify { token, keys, json } => {
                commands::token::verify(&config, &keys, token, json)
            }
        },
    }
}
