//! Button input state machine.
//!
//! # Responsibility
//! - Assemble the equation string from discrete key presses.
//! - Hand the finished equation to the evaluator on `=`.
//!
//! # Invariants
//! - `buffer` is never empty; it defaults to `"0"`.
//! - The prefix is either empty or ends with `" <op> "`.
//! - Only `Key::Equals` produces a `NewCalculation`.

use crate::calculator::eval::evaluate;
use crate::model::calculation::NewCalculation;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Buffer contents after a reset.
pub const DEFAULT_BUFFER: &str = "0";
/// Buffer contents after a failed evaluation.
pub const ERROR_MARKER: &str = "Error";

/// Binary operator keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Percent,
}

impl Operator {
    /// Symbol written into the equation string.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
            Self::Percent => '%',
        }
    }
}

/// One calculator button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    /// `AC`
    Clear,
    /// `DEL`
    Delete,
    /// `=`
    Equals,
}

/// Label that does not name any calculator button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl Display for UnknownKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown key `{}`", self.0)
    }
}

impl Error for UnknownKey {}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let key = match label.trim() {
            "." => Self::Decimal,
            "+" => Self::Operator(Operator::Add),
            "-" => Self::Operator(Operator::Subtract),
            "*" | "x" => Self::Operator(Operator::Multiply),
            "/" => Self::Operator(Operator::Divide),
            "%" => Self::Operator(Operator::Percent),
            "=" => Self::Equals,
            other if other.eq_ignore_ascii_case("ac") => Self::Clear,
            other if other.eq_ignore_ascii_case("del") => Self::Delete,
            other => match other.as_bytes() {
                [digit @ b'0'..=b'9'] => Self::Digit(digit - b'0'),
                _ => return Err(UnknownKey(other.to_string())),
            },
        };
        Ok(key)
    }
}

/// Ephemeral display state of the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    prefix: String,
    reset_pending: bool,
    /// Operator pressed and no operand entered since.
    awaiting_operand: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER.to_string(),
            prefix: String::new(),
            reset_pending: false,
            awaiting_operand: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current operand or result shown on the main display line.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Pending left-hand side and operator, e.g. `"12 + "`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the next digit starts a new operand.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Whether the display currently shows the evaluation error marker.
    pub fn shows_error(&self) -> bool {
        self.buffer == ERROR_MARKER
    }

    /// Applies one key press.
    ///
    /// Returns the evaluated calculation when `Key::Equals` succeeds, so the
    /// caller can persist it.
    pub fn press(&mut self, key: Key) -> Option<NewCalculation> {
        match key {
            Key::Digit(digit) => {
                self.enter(char::from(b'0' + digit.min(9)));
                None
            }
            Key::Decimal => {
                self.enter('.');
                None
            }
            Key::Operator(op) => {
                self.apply_operator(op);
                None
            }
            Key::Clear => {
                *self = Self::default();
                None
            }
            Key::Delete => {
                self.delete_last();
                None
            }
            Key::Equals => self.calculate(),
        }
    }

    /// Places a recalled history result in the buffer.
    ///
    /// The prefix and reset flag are left as they are.
    pub fn recall(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        self.buffer = value.to_string();
        self.awaiting_operand = false;
    }

    fn enter(&mut self, ch: char) {
        self.awaiting_operand = false;
        let starts_operand = self.reset_pending || self.shows_error();
        if ch == '.' && !starts_operand && self.buffer == DEFAULT_BUFFER {
            // A typed `0` stays part of the operand: `0 . 1` is `0.1`.
            self.buffer.push('.');
            return;
        }
        if self.buffer == DEFAULT_BUFFER || starts_operand {
            self.buffer = ch.to_string();
            self.reset_pending = false;
            return;
        }
        if ch == '.' && self.buffer.contains('.') {
            return;
        }
        self.buffer.push(ch);
    }

    fn apply_operator(&mut self, op: Operator) {
        if self.shows_error() {
            return;
        }
        if self.awaiting_operand {
            // Swap the pending operator instead of stacking a second one.
            self.prefix.truncate(self.prefix.len().saturating_sub(3));
        } else {
            self.prefix.push_str(&self.buffer);
        }
        self.prefix.push(' ');
        self.prefix.push(op.symbol());
        self.prefix.push(' ');
        self.reset_pending = true;
        self.awaiting_operand = true;
    }

    fn delete_last(&mut self) {
        if self.shows_error() {
            self.buffer = DEFAULT_BUFFER.to_string();
            return;
        }
        self.buffer.pop();
        if self.buffer.is_empty() {
            self.buffer = DEFAULT_BUFFER.to_string();
        }
    }

    fn calculate(&mut self) -> Option<NewCalculation> {
        let equation = format!("{}{}", self.prefix, self.buffer);
        self.prefix.clear();
        self.reset_pending = true;
        self.awaiting_operand = false;

        match evaluate(&equation) {
            Ok(result) => {
                self.buffer = result.clone();
                Some(NewCalculation::new(equation, result))
            }
            Err(err) => {
                debug!("event=calculate module=calculator status=error error={err}");
                self.buffer = ERROR_MARKER.to_string();
                None
            }
        }
    }
}
