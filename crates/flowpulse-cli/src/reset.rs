//! Interactive confirmation for the destructive `reset` command.

use std::io::{self, BufRead, Write};

/// Accepts `yes` in any case, ignoring surrounding whitespace.
pub(crate) fn confirmation_accepted(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

/// Ask on stdout and read one line from stdin.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed or stdin cannot be read.
pub(crate) fn prompt_confirmation() -> anyhow::Result<bool> {
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "WARNING: this drops the workflows table and deletes every stored record."
    )?;
    write!(stdout, "Type 'yes' to proceed: ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(confirmation_accepted(&answer))
}
