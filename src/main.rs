//! otpstash
//!
//! Keeps TOTP secrets under a label and prints their current code

mod cli;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use otpstash::{store::FileStore, store::StoreError, OtpError};

use cli::commands::{unix_now, App, Dispatcher};
use cli::output::{Palette, Presenter};
use cli::{clipboard, default_store_path, Cli};

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 3;
const EXIT_DECODE: u8 = 4;
const EXIT_STORE: u8 = 5;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("OTPSTASH_LOG", "warn"))
        .init();

    let args = Cli::parse();
    let palette = Palette::new(!args.no_color && io::stdout().is_terminal());

    match run(args, palette) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", palette.error("Error:"), e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(args: Cli, palette: Palette) -> Result<()> {
    let path = args.store.unwrap_or_else(default_store_path);

    let store = FileStore::open(&path)
        .with_context(|| format!("Failed to open the key store at {}", path.display()))?;
    debug!("using store {}", store.path().display());

    let mut app = App::new(
        Dispatcher::new(store),
        io::stdin().lock(),
        Presenter::new(io::stdout().lock(), palette),
        clipboard::copy,
    );

    app.run(args.command, args.reference, unix_now()?)
}

/// Picks the exit status from the first library error in the chain.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<StoreError>() {
            return match e {
                StoreError::NotFound(_) => EXIT_NOT_FOUND,
                StoreError::InvalidLabel => EXIT_FAILURE,
                _ => EXIT_STORE,
            };
        }

        if let Some(e) = cause.downcast_ref::<OtpError>() {
            return match e {
                OtpError::SecretDecode(_) => EXIT_DECODE,
                _ => EXIT_FAILURE,
            };
        }
    }

    EXIT_FAILURE
}
