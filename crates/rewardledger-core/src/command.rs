//! Closed command set for interactive sessions.
//!
//! A line of user input parses into a [`Command`]; [`crate::Ledger::execute`]
//! turns it into a [`Response`]. Rendering is left to the caller.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::ledger::{EarnedReport, RedemptionReport, StatusReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// One completion event for a set of task IDs.
    Complete(Vec<String>),
    Redeem(String),
    Status,
    Reset,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "report", rename_all = "snake_case")]
pub enum Response {
    Earned(EarnedReport),
    Redeemed(RedemptionReport),
    Status(StatusReport),
    Reset,
    Exit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs at least one ID")]
    MissingArgument(&'static str),

    #[error("'{0}' takes exactly one ID")]
    TooManyArguments(&'static str),
}

/// Split `T1,T3 T5` style input into individual IDs.
pub fn split_ids<'a>(args: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    args.into_iter()
        .flat_map(|a| a.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl FromStr for Command {
    type Err = ParseCommandError;

    /// Accepts the verbs and the numbered menu entries shown by the shell:
    ///
    /// | verb                                    | menu |
    /// |-----------------------------------------|------|
    /// | `complete`, `done`, `complete_chapter`  | `1`  |
    /// | `status`, `show_status`                 | `2`  |
    /// | `redeem`, `redeem_reward`               | `3`  |
    /// | `reset`                                 | `4`  |
    /// | `exit`, `quit`                          | `5`  |
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(ParseCommandError::Empty)?;
        let rest: Vec<&str> = words.collect();

        match verb.to_lowercase().as_str() {
            "1" | "complete" | "done" | "complete_chapter" => {
                let ids = split_ids(rest);
                if ids.is_empty() {
                    return Err(ParseCommandError::MissingArgument("complete"));
                }
                Ok(Command::Complete(ids))
            }
            "2" | "status" | "show_status" => Ok(Command::Status),
            "3" | "redeem" | "redeem_reward" => {
                let mut ids = split_ids(rest);
                match ids.len() {
                    0 => Err(ParseCommandError::MissingArgument("redeem")),
                    1 => Ok(Command::Redeem(ids.remove(0))),
                    _ => Err(ParseCommandError::TooManyArguments("redeem")),
                }
            }
            "4" | "reset" => Ok(Command::Reset),
            "5" | "exit" | "quit" => Ok(Command::Exit),
            _ => Err(ParseCommandError::Unknown(verb.to_string())),
        }
    }
}
