//! CLI command handlers

use std::io::{BufRead, Write};
use std::time::SystemTime;

use anyhow::{Context, Result};
use log::{info, warn};
use otpstash::{
    normalize_secret, resolver,
    store::SecretStore,
    totp::Totp,
    Otp, OtpCode,
};

use super::{
    output::{OutputMode, Presenter},
    picker, Commands,
};

const URI_PREFIX: &str = "otpauth://";

/// Seconds since the UNIX epoch
pub fn unix_now() -> Result<u64> {
    let since_epoch = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .context("System clock is set before the UNIX epoch")?;

    Ok(since_epoch.as_secs())
}

/// A freshly computed code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCode {
    pub label: String,
    pub code: OtpCode,
    /// Seconds until the code rolls over
    pub remaining: u64,
}

/// Store operations behind every command, on an explicit store handle
pub struct Dispatcher<S> {
    store: S,
}

impl<S: SecretStore> Dispatcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Saves a secret under `label`. The secret is either base32 text or an
    /// `otpauth://totp/` URI; it is validated and normalized before saving.
    pub fn add(&mut self, label: &str, secret: &str) -> Result<()> {
        let secret = if secret.starts_with(URI_PREFIX) {
            let totp = Totp::from_uri(secret).context("Failed to read the otpauth URI")?;
            totp.secret().to_string()
        } else {
            normalize_secret(secret)
        };

        Totp::decode_secret(&secret)
            .with_context(|| format!("The secret for '{label}' is not valid base32"))?;

        self.store
            .put(label, &secret)
            .with_context(|| format!("Failed to save '{label}'"))?;
        info!("saved key {label}");

        Ok(())
    }

    /// Resolves `reference` and computes its code at `now`.
    pub fn code(&self, reference: &[String], now: u64) -> Result<CurrentCode> {
        let label = resolver::resolve(&self.store, reference)?;
        let totp = Totp::new(self.store.get(&label)?);

        let code = totp
            .generate(now)
            .with_context(|| format!("Failed to compute the code for '{label}'"))?;

        Ok(CurrentCode {
            label,
            code,
            remaining: totp.remaining_seconds(now),
        })
    }

    /// Resolves `reference` and deletes it, returning the removed label.
    pub fn remove(&mut self, reference: &[String]) -> Result<String> {
        let label = resolver::resolve(&self.store, reference)?;
        self.store
            .delete(&label)
            .with_context(|| format!("Failed to remove '{label}'"))?;
        info!("removed key {label}");

        Ok(label)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.store.labels()?)
    }

    pub fn list_filtered(&self, query: &[String]) -> Result<Vec<String>> {
        Ok(resolver::matching(&self.store, query)?)
    }

    /// Resolves `reference` and renders it as an otpauth URI.
    pub fn uri(&self, reference: &[String], issuer: Option<&str>) -> Result<String> {
        let label = resolver::resolve(&self.store, reference)?;
        let secret = self.store.get(&label)?;

        Ok(Totp::new(secret).to_uri(&label, issuer)?)
    }
}

/// Wires a dispatcher to the terminal: where selections are read from,
/// where output goes and how codes reach the clipboard.
pub struct App<S, R, W> {
    dispatcher: Dispatcher<S>,
    input: R,
    presenter: Presenter<W>,
    copy: fn(&str) -> Result<()>,
}

impl<S: SecretStore, R: BufRead, W: Write> App<S, R, W> {
    pub fn new(
        dispatcher: Dispatcher<S>,
        input: R,
        presenter: Presenter<W>,
        copy: fn(&str) -> Result<()>,
    ) -> Self {
        Self {
            dispatcher,
            input,
            presenter,
            copy,
        }
    }

    pub fn run(&mut self, command: Option<Commands>, reference: Vec<String>, now: u64) -> Result<()> {
        match command {
            Some(Commands::Add { label, secret }) => {
                self.dispatcher.add(&label, &secret)?;
                self.presenter
                    .line(&format!("Your key and secret have been saved as '{label}'"))?;
            }
            Some(Commands::Ls) => {
                let labels = self.dispatcher.list()?;
                if labels.is_empty() {
                    self.presenter.line("No keys stored yet")?;
                } else {
                    self.presenter.labels(&labels)?;
                }
            }
            Some(Commands::Rm { reference }) => {
                let label = self.dispatcher.remove(&reference)?;
                self.presenter.line(&format!("Removed '{label}'"))?;
            }
            Some(Commands::Get { reference }) => {
                self.show(&reference, OutputMode::Simple, now)?;
            }
            Some(Commands::Uri { issuer, reference }) => {
                let uri = self.dispatcher.uri(&reference, issuer.as_deref())?;
                self.presenter.line(&uri)?;
            }
            Some(Commands::LsJson) => {
                let labels = self.dispatcher.list()?;
                self.presenter.picker_json(labels)?;
            }
            Some(Commands::QueryJson { query }) => {
                let labels = self.dispatcher.list_filtered(&query)?;
                self.presenter.picker_json(labels)?;
            }
            None if reference.is_empty() => self.interactive(now)?,
            None => self.show(&reference, OutputMode::Terminal, now)?,
        }

        Ok(())
    }

    fn interactive(&mut self, now: u64) -> Result<()> {
        let labels = self.dispatcher.list()?;
        if labels.is_empty() {
            self.presenter
                .line("No keys stored yet, add one with: otpstash add <label> <secret>")?;
            return Ok(());
        }

        let palette = self.presenter.palette();
        match picker::select(&labels, palette, &mut self.input, self.presenter.writer())? {
            Some(tokens) => self.show(&tokens, OutputMode::Terminal, now),
            None => self.presenter.line("Nothing selected"),
        }
    }

    fn show(&mut self, reference: &[String], mode: OutputMode, now: u64) -> Result<()> {
        let current = self.dispatcher.code(reference, now)?;

        self.presenter.code(mode, &current)?;

        if mode == OutputMode::Terminal {
            match (self.copy)(&current.code.to_string()) {
                Ok(()) => {
                    let note = self.presenter.palette().dim("Copied to your clipboard");
                    self.presenter.line(&note)?;
                }
                Err(e) => {
                    warn!("clipboard copy failed: {e:#}");
                    let note = self
                        .presenter
                        .palette()
                        .error(&format!("Could not copy to your clipboard: {e}"));
                    self.presenter.line(&note)?;
                }
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn into_presenter(self) -> Presenter<W> {
        self.presenter
    }
}
