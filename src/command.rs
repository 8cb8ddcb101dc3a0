//! User-facing commands and the display-ordering strategies they select.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How "the next display" is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The display after the current one in OS enumeration order.
    ///
    /// This order is whatever the platform reports and can change when a
    /// monitor is powered off, even though the display settings do not.
    Enumeration,
    /// The display after the current one when walking clockwise around the
    /// centroid of all display centers.
    #[default]
    Clockwise,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Enumeration => write!(f, "enumeration"),
            Strategy::Clockwise => write!(f, "clockwise"),
        }
    }
}

/// Every action the binary can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the enumeration, then switch with the given strategy.
    ListAndSwitch(Strategy),
    /// Switch to the next display without printing anything.
    Switch(Strategy),
    /// Print every display the platform reports.
    List,
    /// Print bounds and work area of the display under the cursor.
    Info,
    /// Print usage.
    Help,
}

/// A command-line word that is not a known command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Parse a single command word.  The no-argument case is handled by
    /// [`Command::from_args`], which knows the configured strategy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next" => Ok(Command::Switch(Strategy::Enumeration)),
            "clockwise" => Ok(Command::Switch(Strategy::Clockwise)),
            "list" => Ok(Command::List),
            "info" => Ok(Command::Info),
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl Command {
    /// Build a command from the process arguments (without the program
    /// name).  No arguments means "list, then switch with `default`".
    pub fn from_args<I, S>(args: I, default: Strategy) -> Result<Self, UnknownCommand>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let Some(first) = args.next() else {
            return Ok(Command::ListAndSwitch(default));
        };
        if let Some(extra) = args.next() {
            return Err(UnknownCommand(format!(
                "{} {}",
                first.as_ref(),
                extra.as_ref()
            )));
        }
        first.as_ref().parse()
    }
}

/// Usage text printed for `help` and after an unknown command.
pub const USAGE: &str = "\
usage: monswitch [COMMAND]

Moves the mouse cursor to the center of the next display.

With no command, lists all displays and then switches using the
configured strategy (clockwise unless configured otherwise).

commands:
  next        switch in OS enumeration order
  clockwise   switch clockwise around the display cluster
  list        list all displays
  info        show the display under the cursor
  help        show this message";
