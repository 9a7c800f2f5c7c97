//! Line-oriented front end for a [`Session`].

use std::io::Write;
use std::path::PathBuf;

use skinsight_client::ClassifierBackend;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::display;
use crate::session::{Session, newest_first};

#[derive(Debug, PartialEq)]
pub enum Action {
    Open(PathBuf),
    Classify,
    Clear,
    Another,
    History,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  open <path>   select an image
  classify      submit the selected image
  clear         drop the selected image
  another       dismiss the result and classify another image
  history       reload and show previous classifications
  help          show this text
  quit          leave the session";

pub fn parse_action(line: &str) -> Result<Action, String> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };
    match cmd.to_ascii_lowercase().as_str() {
        "open" | "select" => {
            if rest.is_empty() {
                Err("usage: open <path>".to_string())
            } else {
                Ok(Action::Open(PathBuf::from(rest)))
            }
        }
        "classify" => Ok(Action::Classify),
        "clear" => Ok(Action::Clear),
        "another" => Ok(Action::Another),
        "history" => Ok(Action::History),
        "help" | "?" => Ok(Action::Help),
        "quit" | "exit" | "q" => Ok(Action::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

/// Drive `session` from `input` until `quit` or end of input.
///
/// With `spinner` set, a terminal spinner runs while a request is pending.
pub async fn run<B, R, W>(
    session: &mut Session<B>,
    input: R,
    out: &mut W,
    base_url: &str,
    spinner: bool,
) -> anyhow::Result<()>
where
    B: ClassifierBackend,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    display::print_banner(out)?;
    session.load().await;
    display::print_view(out, &session.view(), base_url)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };

        match action {
            Action::Quit => break,
            Action::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Action::Open(path) => {
                if let Err(e) = session.select(&path) {
                    writeln!(out, "{e}")?;
                    continue;
                }
            }
            Action::Clear => {
                if let Err(e) = session.clear() {
                    writeln!(out, "{e}")?;
                    continue;
                }
            }
            Action::Another => session.clear_result().await,
            Action::History => {
                session.refresh_history().await;
                display::print_history(out, &newest_first(session.history()), base_url)?;
                continue;
            }
            Action::Classify => {
                if let Err(e) = session.begin_classify() {
                    writeln!(out, "{e}")?;
                    continue;
                }
                display::print_view(out, &session.view(), base_url)?;
                let pb = spinner.then(|| display::spinner("Classifying image..."));
                let outcome = session.finish_classify().await;
                if let Some(pb) = pb {
                    pb.finish_and_clear();
                }
                if let Err(e) = outcome {
                    writeln!(out, "{e}")?;
                }
            }
        }

        writeln!(out)?;
        display::print_view(out, &session.view(), base_url)?;
    }
    Ok(())
}
