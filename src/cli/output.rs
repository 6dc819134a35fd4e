//! Presentation of codes and listings

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use super::commands::CurrentCode;

/// How a code is shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Sentence with the remaining validity, followed by a clipboard copy
    Terminal,
    /// The bare code, for scripts
    Simple,
}

/// ANSI styling, or none at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn code(&self, text: &str) -> String {
        self.paint("1;32", text)
    }

    pub fn label(&self, text: &str) -> String {
        self.paint("1", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint("31", text)
    }
}

/// Script filter payload read by launcher pickers
#[derive(Debug, Default, Serialize)]
pub struct PickerItems {
    items: Vec<PickerItem>,
}

#[derive(Debug, Serialize)]
struct PickerItem {
    #[serde(rename = "type")]
    kind: &'static str,
    title: String,
    arg: String,
    autocomplete: String,
}

impl PickerItems {
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self {
            items: labels
                .into_iter()
                .map(|label| PickerItem {
                    kind: "default",
                    title: label.clone(),
                    arg: label.clone(),
                    autocomplete: label,
                })
                .collect(),
        }
    }
}

/// Writes everything the commands print
pub struct Presenter<W> {
    out: W,
    palette: Palette,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn code(&mut self, mode: OutputMode, current: &CurrentCode) -> Result<()> {
        let code = current.code.to_string();
        match mode {
            OutputMode::Terminal => writeln!(
                self.out,
                "{}: {} {}",
                self.palette.label(&current.label),
                self.palette.code(&code),
                self.palette
                    .dim(&format!("(valid for {}s)", current.remaining))
            )?,
            OutputMode::Simple => writeln!(self.out, "{code}")?,
        }
        Ok(())
    }

    pub fn labels(&mut self, labels: &[String]) -> Result<()> {
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.out, "{}: {}", i + 1, label)?;
        }
        Ok(())
    }

    pub fn picker_json(&mut self, labels: Vec<String>) -> Result<()> {
        let json = serde_json::to_string(&PickerItems::from_labels(labels))?;
        writeln!(self.out, "{json}")?;
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
