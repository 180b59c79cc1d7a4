//! # Desktop calculator expression engine
//!
//! Evaluates a user-typed infix expression such as `3+4*(2-1)^2` and renders
//! the result the way a calculator display expects it. The UI around it
//! (buttons, keyboard, history sidebar, clipboard) only ever calls
//! [`evaluate`] or [`evaluate_display`] with the raw expression string.
//!
//! Supported input is ASCII digits, `.`, the operators below, parentheses,
//! and the literal `ans`, which stands for the most recent successful
//! result from the [`History`] ledger.
//!
//! Operators, starting from highest priority:
//! * `^` - power, right-associative: `2^3^2` is `2^(3^2)` = `512`
//! * `*`, `/` - multiplication and division, left-associative
//! * `+`, `-` - addition and subtraction, left-associative
//!
//! Unary minus is supported at the start of an expression, directly after
//! another operator, and directly before an opening parenthesis.
//! Unmatched opening parentheses are closed automatically at the end of
//! the input, and an empty group `()` is removed without being evaluated.
//!
//! Results are rendered by magnitude:
//! * mathematically integral values print without a decimal point: `4/2`
//!   is `2`, never `2.0`
//! * values above the scientific threshold (default `1e9`) print as
//!   `{:.6e}`, e.g. `1.000000e10`
//! * values above the overflow ceiling (default `1e25`) fail instead of
//!   printing
//! * everything else prints as a plain shortest round-trip decimal
//!
//! Division by a divisor closer to zero than `1e-15` fails rather than
//! producing a near-infinity, and every failure reaches the caller as a
//! [`CalcError`] value; [`evaluate_display`] renders it in the
//! `Error: <message>` form the calculator display shows.

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod eval;
pub mod history;
pub mod parse;
pub mod reduce;
pub mod resolve;
pub mod value;

pub use crate::errors::CalcError;
pub use crate::eval::{evaluate, evaluate_display, evaluate_with};
pub use crate::history::{History, HistoryEntry};
pub use crate::value::{Limits, Value};
