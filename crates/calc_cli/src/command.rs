//! Parsing of one REPL input line.
//!
//! A line is either a history command (`history`, `recall N`, `delete N`,
//! `clear-history`, `help`, `quit`) or a sequence of calculator key labels.
//! Key labels may be separated by whitespace or run together: `12 + 4 =` and
//! `12+4=` press the same keys. `AC` and `DEL` must stand alone.

use calc_core::{Key, UnknownKey};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Calculator keys, pressed in order.
    Keys(Vec<Key>),
    /// Redraw the history panel.
    History,
    /// Feed the result of the Nth visible entry (1-based) into the buffer.
    Recall(usize),
    /// Delete the Nth visible entry (1-based).
    Delete(usize),
    ClearHistory,
    Help,
    Quit,
}

/// Input line that is neither a command nor a key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    UnknownKey(UnknownKey),
    MissingPosition(&'static str),
    InvalidPosition(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "nothing to do"),
            Self::UnknownKey(err) => write!(f, "{err}"),
            Self::MissingPosition(command) => {
                write!(f, "`{command}` needs a history position, e.g. `{command} 1`")
            }
            Self::InvalidPosition(raw) => {
                write!(f, "history position must be a number from 1, got `{raw}`")
            }
        }
    }
}

impl Error for CommandError {}

impl From<UnknownKey> for CommandError {
    fn from(value: UnknownKey) -> Self {
        Self::UnknownKey(value)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err(CommandError::Empty);
        };

        match first.to_ascii_lowercase().as_str() {
            "history" | "h" => Ok(Self::History),
            "recall" | "r" => parse_position("recall", words.next()).map(Self::Recall),
            "delete" | "rm" => parse_position("delete", words.next()).map(Self::Delete),
            "clear-history" => Ok(Self::ClearHistory),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => parse_keys(line).map(Self::Keys),
        }
    }
}

fn parse_position(command: &'static str, raw: Option<&str>) -> Result<usize, CommandError> {
    let raw = raw.ok_or(CommandError::MissingPosition(command))?;
    match raw.parse::<usize>() {
        Ok(position) if position >= 1 => Ok(position),
        _ => Err(CommandError::InvalidPosition(raw.to_string())),
    }
}

fn parse_keys(line: &str) -> Result<Vec<Key>, CommandError> {
    let mut keys = Vec::new();
    for word in line.split_whitespace() {
        match word.parse::<Key>() {
            Ok(key) => keys.push(key),
            Err(err) => {
                // Run-together labels, one key per character.
                if word.chars().count() < 2 {
                    return Err(err.into());
                }
                for label in word.chars() {
                    keys.push(label.to_string().parse::<Key>()?);
                }
            }
        }
    }
    Ok(keys)
}

/// Usage text for `help`.
pub const HELP: &str = "\
keys:     0-9 . + - * x / % = AC DEL  (e.g. `12 + 4 =` or `12+4=`)
history   show recent calculations
recall N  put the result of entry N into the display
delete N  delete entry N
clear-history  delete every stored calculation
quit      leave";

#[cfg(test)]
mod tests {
    use super::{Command, CommandError};
    use calc_core::{Key, Operator};

    #[test]
    fn spaced_and_compact_key_runs_press_same_keys() {
        let expected = Command::Keys(vec![
            Key::Digit(1),
            Key::Digit(2),
            Key::Operator(Operator::Add),
            Key::Digit(4),
            Key::Equals,
        ]);
        assert_eq!("1 2 + 4 =".parse::<Command>().unwrap(), expected);
        assert_eq!("12+4=".parse::<Command>().unwrap(), expected);
        assert_eq!("12 + 4 =".parse::<Command>().unwrap(), expected);
    }

    #[test]
    fn word_keys_parse_case_insensitively() {
        assert_eq!(
            "ac 7 DEL".parse::<Command>().unwrap(),
            Command::Keys(vec![Key::Clear, Key::Digit(7), Key::Delete])
        );
    }

    #[test]
    fn history_commands_take_one_based_positions() {
        assert_eq!("history".parse::<Command>().unwrap(), Command::History);
        assert_eq!("recall 3".parse::<Command>().unwrap(), Command::Recall(3));
        assert_eq!("delete 1".parse::<Command>().unwrap(), Command::Delete(1));
        assert_eq!(
            "clear-history".parse::<Command>().unwrap(),
            Command::ClearHistory
        );
        assert_eq!("QUIT".parse::<Command>().unwrap(), Command::Quit);

        assert_eq!(
            "recall".parse::<Command>().unwrap_err(),
            CommandError::MissingPosition("recall")
        );
        assert_eq!(
            "delete 0".parse::<Command>().unwrap_err(),
            CommandError::InvalidPosition("0".to_string())
        );
    }

    #[test]
    fn unknown_labels_and_blank_lines_are_errors() {
        assert!(matches!(
            "12&4".parse::<Command>(),
            Err(CommandError::UnknownKey(_))
        ));
        assert!(matches!(
            "y".parse::<Command>(),
            Err(CommandError::UnknownKey(_))
        ));
        assert_eq!("   ".parse::<Command>().unwrap_err(), CommandError::Empty);
    }
}
