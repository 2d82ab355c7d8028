//! Parses systemd `OnCalendar`-style calendar event expressions and computes
//! the instants they match.
//!
//! ```
//! use oncal::parse;
//! use jiff::civil::date;
//! use jiff::tz::TimeZone;
//!
//! let expr = parse("Mon..Fri 09:00:00").unwrap();
//! let from = date(2024, 1, 1).at(0, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();
//! let next = expr.next(&from).unwrap();
//! assert_eq!(next.date().weekday(), jiff::civil::Weekday::Monday);
//! ```
//!
//! The surface grammar is documented on [`parse`]. An [`Expression`] is an
//! immutable, normalized value: every numeric field is a sorted,
//! deduplicated list within its domain, and a time zone name (if any) is
//! kept verbatim and only resolved when matching against an instant.

mod engine;
mod error;
mod expression;
mod field;
mod names;
mod parser;

pub use engine::zero_instant;
pub use error::ParseError;
pub use expression::Expression;
pub use parser::{must_parse, parse};
