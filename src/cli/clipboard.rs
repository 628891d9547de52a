//! Clipboard delivery through whatever copy command the platform has.

use anyhow::{bail, Context, Result};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

/// Copy commands tried in order, with their arguments.
const COPY_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// Copy `text` to the system clipboard. Returns the command that took it.
pub fn copy_to_clipboard(text: &str) -> Result<&'static str> {
    copy_with(COPY_COMMANDS, text)
}

fn copy_with(candidates: &[(&'static str, &[&str])], text: &str) -> Result<&'static str> {
    for &(program, args) in candidates {
        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => {
                tracing::debug!(program, error = %err, "clipboard command failed to start");
                continue;
            }
        };

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let status = child.wait().with_context(|| format!("failed to wait for {program}"))?;
        match written {
            Ok(()) if status.success() => {
                tracing::debug!(program, bytes = text.len(), "copied to clipboard");
                return Ok(program);
            }
            Ok(()) => tracing::debug!(program, %status, "clipboard command exited unsuccessfully"),
            Err(err) => tracing::debug!(program, error = %err, "clipboard command closed its input"),
        }
    }

    let tried: Vec<&str> = candidates.iter().map(|(program, _)| *program).collect();
    bail!("no clipboard command available (tried {})", tried.join(", "))
}
