//! Console command line parsing.
//!
//! The console reads one command per line. Navigation keys have short
//! forms so the list can be walked with `j`/`k` and Enter.

use crate::api::Classification;
use crate::console::list::Step;
use crate::core::{SourceView, resolve_message_ref};
use crate::error::CommandError;
use std::path::PathBuf;

/// Help text listing the console commands.
pub const HELP: &str = "\
Commands:
  j | down             select the next (older) message
  k | up               select the previous (newer) message
  <n>                  select row n of the list
  /<words>             search; a lone / clears the search
  open <uuid|link>     open a message by UUID or #uuid= link
  view <text|html|source|log>
                       switch the source view
  ] | [                scroll the message contents down / up
  ham | spam           report the selected message (asks to confirm)
  y | n                answer a confirmation
  download [path]      save the selected message as .eml
  refresh | r          reload the message list
  grow [n] | shrink [n]
                       resize the message list pane
  help | ?             toggle this help
  quit | q             leave the console";

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Move the selection.
    Step(Step),
    /// Select a list row (1-based on screen, stored 0-based).
    SelectRow(usize),
    /// Replace the search query.
    Search(String),
    /// Open a message by UUID.
    Open(String),
    /// Switch the source view.
    View(SourceView),
    /// Scroll the contents pane by this many pages.
    ScrollContents(i32),
    /// Ask to report the selected message.
    Learn(Classification),
    /// Answer a pending confirmation.
    Confirm(bool),
    /// Save the selected message.
    Download(Option<PathBuf>),
    /// Reload the list now.
    Refresh,
    /// Grow (positive) or shrink (negative) the list pane.
    ResizeList(i32),
    /// Toggle the help text.
    Help,
    /// Leave the console.
    Quit,
    /// Empty input.
    Nothing,
}

const DEFAULT_RESIZE_STEP: i32 = 3;

/// Parses one input line.
///
/// # Errors
///
/// Returns [`CommandError::InvalidArgument`] for unknown commands and bad
/// arguments.
pub fn parse_command(line: &str) -> Result<UserCommand, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(UserCommand::Nothing);
    }
    if let Some(query) = line.strip_prefix('/') {
        return Ok(UserCommand::Search(query.trim().to_string()));
    }
    if let Ok(row) = line.parse::<usize>() {
        return row
            .checked_sub(1)
            .map(UserCommand::SelectRow)
            .ok_or_else(|| CommandError::InvalidArgument("rows start at 1".to_string()));
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let command = match word.to_lowercase().as_str() {
        "j" | "down" => UserCommand::Step(Step::Next),
        "k" | "up" => UserCommand::Step(Step::Previous),
        "open" | "o" => {
            let uuid = resolve_message_ref(rest).ok_or_else(|| {
                CommandError::InvalidArgument("open needs a message UUID or link".to_string())
            })?;
            UserCommand::Open(uuid)
        }
        "view" | "v" => UserCommand::View(rest.parse()?),
        "]" => UserCommand::ScrollContents(1),
        "[" => UserCommand::ScrollContents(-1),
        "ham" => UserCommand::Learn(Classification::Ham),
        "spam" => UserCommand::Learn(Classification::Spam),
        "y" | "yes" => UserCommand::Confirm(true),
        "n" | "no" => UserCommand::Confirm(false),
        "download" | "d" => UserCommand::Download((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "refresh" | "r" => UserCommand::Refresh,
        "grow" => UserCommand::ResizeList(resize_amount(rest)?),
        "shrink" => UserCommand::ResizeList(-resize_amount(rest)?),
        "help" | "?" => UserCommand::Help,
        "quit" | "q" | "exit" => UserCommand::Quit,
        other => {
            return Err(CommandError::InvalidArgument(format!(
                "unknown command '{other}' (type help)"
            )));
        }
    };
    Ok(command)
}

fn resize_amount(arg: &str) -> Result<i32, CommandError> {
    if arg.is_empty() {
        return Ok(DEFAULT_RESIZE_STEP);
    }
    arg.parse::<u16>()
        .map(i32::from)
        .map_err(|_| CommandError::InvalidArgument(format!("not a row count: {arg}")))
}
