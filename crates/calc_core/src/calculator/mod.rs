//! Client-side calculator: button input assembly and arithmetic evaluation.
//!
//! # Responsibility
//! - Turn discrete button events into an equation string.
//! - Evaluate that string as plain arithmetic and render the result.
//!
//! # Invariants
//! - No input reaches anything but the arithmetic grammar in `eval`.

pub mod eval;
pub mod input;
