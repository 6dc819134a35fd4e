//! Interactive selection when no reference is given

use std::io::{BufRead, Write};

use anyhow::Result;

use super::output::Palette;

/// Shows the numbered labels and reads one line of selection. The answer is
/// split into tokens, ready for the resolver; `None` when nothing was typed.
pub fn select<R: BufRead, W: Write>(
    labels: &[String],
    palette: Palette,
    mut input: R,
    mut output: W,
) -> Result<Option<Vec<String>>> {
    for (i, label) in labels.iter().enumerate() {
        writeln!(output, "{}: {}", palette.dim(&(i + 1).to_string()), label)?;
    }
    write!(output, "Select a key (index or query): ")?;
    output.flush()?;

    let mut buffer = String::new();
    input.read_line(&mut buffer)?;

    let tokens: Vec<String> = buffer.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        return Ok(None);
    }

    Ok(Some(tokens))
}
