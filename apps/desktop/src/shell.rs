//! Line-oriented stand-in for the add form, the "Fetch Movies" button and the list.

use std::{io::Write, sync::Arc};

use anyhow::Result;
use client_core::{list_view, FetchCoordinator, FetchState, StartupTrigger, WriteSubmitter};
use shared::domain::NewMovie;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "commands: fetch | add <title> | <opening text> | <release date> | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Fetch,
    Add(NewMovie),
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    match verb {
        "fetch" => Ok(ShellCommand::Fetch),
        "show" => Ok(ShellCommand::Show),
        "help" | "" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "add" => {
            let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
            match fields.as_slice() {
                [title, opening_text, release_date]
                    if !title.is_empty() && !release_date.is_empty() =>
                {
                    Ok(ShellCommand::Add(NewMovie::new(
                        *title,
                        *opening_text,
                        *release_date,
                    )))
                }
                _ => Err("usage: add <title> | <opening text> | <release date>".to_string()),
            }
        }
        other => Err(format!("unknown command '{other}'; {HELP}")),
    }
}

pub fn render(state: &FetchState) -> String {
    list_view(state)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drives the session until `quit` or end of input, re-rendering the list whenever the
/// coordinator's state changes. Returns the output sink.
pub async fn run<R, W>(
    coordinator: Arc<FetchCoordinator>,
    submitter: WriteSubmitter,
    input: R,
    mut out: W,
) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut startup = StartupTrigger::new();
    let mut changes = coordinator.watch();
    let mut lines = input.lines();

    writeln!(out, "{HELP}")?;
    let _ = startup.run(&coordinator);

    loop {
        tokio::select! {
            // Pending state changes render before the next command is handled.
            biased;
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = changes.borrow_and_update().clone();
                writeln!(out, "{}", render(&state))?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(ShellCommand::Fetch) => {
                        coordinator.fetch_all();
                    }
                    Ok(ShellCommand::Add(movie)) => {
                        submitter.submit(movie);
                    }
                    Ok(ShellCommand::Show) => writeln!(out, "{}", render(&coordinator.state()))?,
                    Ok(ShellCommand::Help) => writeln!(out, "{HELP}")?,
                    Ok(ShellCommand::Quit) => break,
                    Err(message) => writeln!(out, "{message}")?,
                }
            }
        }
        out.flush()?;
    }

    Ok(out)
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
