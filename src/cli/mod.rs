//! Command line surface

pub mod clipboard;
pub mod commands;
pub mod output;
pub mod picker;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keeps TOTP secrets under a label and prints their current code
#[derive(Parser, Debug)]
#[command(name = "otpstash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the key store
    #[arg(short, long, global = true, env = "OTPSTASH_STORE")]
    pub store: Option<PathBuf>,

    /// Never colour the output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Label, 1-based index or query of the key to show and copy
    #[arg(allow_negative_numbers = true)]
    pub reference: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save a secret under a label (replaces an existing one)
    Add {
        /// Label to store the secret under
        label: String,
        /// Base32 secret or an otpauth://totp/ URI
        secret: String,
    },

    /// List stored labels with their index
    Ls,

    /// Remove a key
    Rm {
        /// Label, 1-based index or query
        #[arg(required = true, allow_negative_numbers = true)]
        reference: Vec<String>,
    },

    /// Print only the current code
    Get {
        /// Label, 1-based index or query
        #[arg(required = true, allow_negative_numbers = true)]
        reference: Vec<String>,
    },

    /// Print the otpauth:// URI of a key, to move it to another authenticator
    Uri {
        /// Issuer to put in front of the label
        #[arg(long)]
        issuer: Option<String>,
        /// Label, 1-based index or query
        #[arg(required = true, allow_negative_numbers = true)]
        reference: Vec<String>,
    },

    /// List all labels as picker JSON
    #[command(name = "lsJson", alias = "ls-json")]
    LsJson,

    /// List labels matching a query as picker JSON
    #[command(name = "queryJson", alias = "query-json")]
    QueryJson {
        /// Tokens that must all appear in the label
        query: Vec<String>,
    },
}

/// Default store file path
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("otpstash"))
        .unwrap_or_else(|| PathBuf::from(".otpstash"))
        .join("keys.json")
}
