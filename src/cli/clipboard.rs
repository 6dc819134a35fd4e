//! Clipboard copy through the platform's command line tools

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use log::debug;

/// Puts `text` on the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    let (program, args) = match clipboard_command() {
        Some(command) => command,
        None => bail!("No clipboard tool found. Install wl-copy (Wayland), xclip or xsel (X11)."),
    };
    debug!("copying to clipboard with {program}");

    let mut child = Command::new(program)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to start {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {program}"))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }

    Ok(())
}

fn clipboard_command() -> Option<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        Some(("pbcopy", vec![]))
    } else if cfg!(target_os = "windows") {
        Some(("clip", vec![]))
    } else if std::env::var_os("WAYLAND_DISPLAY").is_some() && command_exists("wl-copy") {
        Some(("wl-copy", vec![]))
    } else if command_exists("xclip") {
        Some(("xclip", vec!["-selection", "clipboard"]))
    } else if command_exists("xsel") {
        Some(("xsel", vec!["--clipboard", "--input"]))
    } else {
        None
    }
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
