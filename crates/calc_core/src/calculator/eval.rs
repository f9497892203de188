//! Arithmetic expression evaluation.
//!
//! # Responsibility
//! - Strip non-arithmetic characters from equation strings.
//! - Parse and evaluate `+ - * / %`, unary signs and parentheses.
//! - Render results rounded to eight decimal places.
//!
//! # Invariants
//! - `*`, `/` and `%` bind tighter than `+` and `-`; all are left-associative.
//! - `a % b` evaluates to `a * b / 100`.
//! - Division by zero yields IEEE-754 infinities or NaN, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const RESULT_DECIMALS: usize = 8;
/// Deepest run of nested unary signs and parentheses accepted.
pub const MAX_NESTING_DEPTH: usize = 256;
/// Enough fraction digits to print any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1100;

static NON_ARITHMETIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.()+\-*/%]").expect("valid arithmetic whitelist regex"));

/// Evaluation failure for a sanitized equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Nothing left to evaluate after sanitizing.
    Empty,
    /// Token that cannot appear at this position.
    UnexpectedToken { position: usize, found: char },
    /// Input ended where an operand was expected.
    UnexpectedEnd,
    /// Digits/decimal points that do not form a number, e.g. `1.2.3`.
    InvalidNumber(String),
    /// Missing `)` for an opened `(`.
    UnbalancedParenthesis,
    /// Unary signs or parentheses nested deeper than `MAX_NESTING_DEPTH`.
    TooDeep { limit: usize },
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "expression is empty"),
            Self::UnexpectedToken { position, found } => {
                write!(f, "unexpected `{found}` at position {position}")
            }
            Self::UnexpectedEnd => write!(f, "expression ended unexpectedly"),
            Self::InvalidNumber(text) => write!(f, "invalid number `{text}`"),
            Self::UnbalancedParenthesis => write!(f, "missing closing parenthesis"),
            Self::TooDeep { limit } => write!(f, "expression nests deeper than {limit} levels"),
        }
    }
}

impl Error for EvalError {}

/// Removes every character outside digits, `.`, parentheses and `+ - * / %`.
pub fn sanitize(equation: &str) -> String {
    NON_ARITHMETIC_RE.replace_all(equation, "").into_owned()
}

/// Sanitizes, evaluates and formats an equation string.
///
/// # Errors
/// - Returns `EvalError` for empty or malformed expressions.
pub fn evaluate(equation: &str) -> Result<String, EvalError> {
    let value = evaluate_value(&sanitize(equation))?;
    Ok(format_result(value))
}

/// Renders a value rounded to eight decimals, dropping trailing zeros.
///
/// Rounding works on the exact binary value and sends ties away from zero,
/// so `0.001953125` becomes `0.00195313`.
/// Non-finite values render as `Infinity`, `-Infinity` or `NaN`.
pub fn format_result(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    let rounded: f64 = round_half_away(value).parse().unwrap_or(value);
    if rounded == 0.0 {
        // Collapses `-0` as well.
        return "0".to_string();
    }
    rounded.to_string()
}

/// Decimal text of `value` rounded to `RESULT_DECIMALS` places.
fn round_half_away(value: f64) -> String {
    let exact = format!("{:.prec$}", value.abs(), prec = EXACT_FRACTION_DIGITS);
    let (int_part, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, dropped) = fraction.split_at(RESULT_DECIMALS.min(fraction.len()));

    let mut digits: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|digit| *digit >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - kept.len();
    let mut out = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        out.push('-');
    }
    out.extend(digits[..split].iter().map(|digit| char::from(*digit)));
    out.push('.');
    out.extend(digits[split..].iter().map(|digit| char::from(*digit)));
    out
}

fn evaluate_value(expression: &str) -> Result<f64, EvalError> {
    if expression.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut parser = Parser::new(expression);
    let value = parser.parse_sum()?;
    match parser.peek() {
        None => Ok(value),
        Some(found) => Err(EvalError::UnexpectedToken {
            position: parser.pos,
            found,
        }),
    }
}

/// Recursive-descent parser over a sanitized, whitespace-free expression.
///
/// ```text
/// sum     := product (('+' | '-') product)*
/// product := unary (('*' | '/' | '%') unary)*
/// unary   := ('+' | '-') unary | primary
/// primary := number | '(' sum ')'
/// ```
struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            depth: 0,
            source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.pos += 1;
        Some(next)
    }

    /// Runs `parse` one nesting level deeper, refusing past the cap.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(EvalError::TooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_sum(&mut self) -> Result<f64, EvalError> {
        let mut value = self.parse_product()?;
        while let Some(op @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_product()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn parse_product(&mut self) -> Result<f64, EvalError> {
        let mut value = self.parse_unary()?;
        while let Some(op @ ('*' | '/' | '%')) = self.peek() {
            self.pos += 1;
            let rhs = self.parse_unary()?;
            value = match op {
                '*' => value * rhs,
                '/' => value / rhs,
                _ => value * rhs / 100.0,
            };
        }
        Ok(value)
    }

    fn parse_unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.nested(Self::parse_unary)?)
            }
            Some('+') => {
                self.pos += 1;
                self.nested(Self::parse_unary)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            None => Err(EvalError::UnexpectedEnd),
            Some('(') => {
                self.pos += 1;
                let value = self.nested(Self::parse_sum)?;
                match self.bump() {
                    Some(')') => Ok(value),
                    None => Err(EvalError::UnbalancedParenthesis),
                    Some(found) => Err(EvalError::UnexpectedToken {
                        position: self.pos - 1,
                        found,
                    }),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(found) => Err(EvalError::UnexpectedToken {
                position: self.pos,
                found,
            }),
        }
    }

    fn parse_number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        // Sanitized input is ASCII, so char positions are byte offsets.
        let text = &self.source[start..self.pos];
        if text == "." || text.matches('.').count() > 1 {
            return Err(EvalError::InvalidNumber(text.to_string()));
        }
        text.parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber(text.to_string()))
    }
}
