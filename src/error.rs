//! Errors produced while normalizing and parsing a calendar event expression.

use std::fmt::{self, Display};

/// The default result of this crate's parser.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Why `parse` rejected a calendar event expression.
///
/// Every variant names the field or slot at fault; none of them carry a
/// byte offset since the grammar is small enough that the offending token
/// itself is almost always more useful than a column number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// More than four whitespace-separated slots were given.
    TooManySlots {
        /// How many slots were found.
        found: usize,
    },
    /// A weekday, month, or shorthand keyword was not recognized.
    UnknownToken {
        /// What kind of token was expected ("weekday", "month", ...).
        kind: &'static str,
        /// The offending text.
        token: String,
    },
    /// A numeric value fell outside its field's domain.
    OutOfRange {
        /// The field the value belongs to.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// The inclusive domain the value should have been in.
        domain: (i64, i64),
    },
    /// An `a..b` range had `a > b`, or otherwise produced no values.
    EmptyRange {
        /// The field the range belongs to.
        field: &'static str,
        /// The range start.
        start: i64,
        /// The range end.
        end: i64,
    },
    /// A `/k` step was zero, at least the size of the field's domain, or
    /// produced no values from its base range.
    InvalidStep {
        /// The field the step belongs to.
        field: &'static str,
        /// The rejected step.
        step: i64,
    },
    /// A slot did not match the shape of any remaining field (weekday set,
    /// date, time, zone name).
    MalformedSlot {
        /// The offending slot, verbatim.
        slot: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooManySlots { found } => {
                write!(f, "expected at most 4 whitespace-separated slots, found {found}")
            }
            ParseError::UnknownToken { kind, token } => {
                write!(f, "unrecognized {kind}: {token:?}")
            }
            ParseError::OutOfRange { field, value, domain } => {
                write!(
                    f,
                    "{field} value {value} is out of range [{}, {}]",
                    domain.0, domain.1
                )
            }
            ParseError::EmptyRange { field, start, end } => {
                write!(f, "{field} range {start}..{end} is empty or inverted")
            }
            ParseError::InvalidStep { field, step } => {
                write!(f, "{field} step /{step} is invalid")
            }
            ParseError::MalformedSlot { slot } => {
                write!(f, "slot {slot:?} does not match any recognized shape")
            }
        }
    }
}

impl std::error::Error for ParseError {}
