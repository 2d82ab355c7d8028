//! Normalizer and parser: turns the permissive surface syntax into a fully
//! specified [`Expression`].
//!
//! The pipeline is: expand shorthand keywords, split into up to four
//! whitespace-separated slots, classify each slot by shape (weekday set,
//! date, time, zone name), fill in defaults for absent slots, then parse
//! each slot's sub-fields with the shared grammar in [`crate::field`].

use crate::error::{ParseError, Result};
use crate::expression::{Expression, MAX_YEAR, MIN_YEAR};
use crate::field::{parse_field_list, Domain};
use crate::names::{resolve_month, resolve_weekday};

const WEEKDAY_DOMAIN: Domain = Domain { name: "weekday", min: 0, max: 6 };
const YEAR_DOMAIN: Domain = Domain { name: "year", min: MIN_YEAR as i64, max: MAX_YEAR as i64 };
const MONTH_DOMAIN: Domain = Domain { name: "month", min: 1, max: 12 };
const DAY_DOMAIN: Domain = Domain { name: "day", min: 1, max: 31 };
const HOUR_DOMAIN: Domain = Domain { name: "hour", min: 0, max: 23 };
const MINUTE_DOMAIN: Domain = Domain { name: "minute", min: 0, max: 59 };
const SECOND_DOMAIN: Domain = Domain { name: "second", min: 0, max: 59 };

fn no_names(_: &str) -> Option<i64> {
    None
}

/// Parse a calendar event expression.
///
/// See the crate documentation for the full grammar. Returns a
/// [`ParseError`] describing the first rule violated; `parse` never
/// panics on any input.
pub fn parse(input: &str) -> Result<Expression> {
    let expanded = expand_shorthand(input.trim());
    let input: &str = expanded.as_deref().unwrap_or(input.trim());

    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() > 4 {
        return Err(ParseError::TooManySlots { found: tokens.len() });
    }

    let (weekday_slot, date_slot, time_slot, zone_slot) = classify_slots(tokens)?;

    let (weekdays, weekday_restricted) = match weekday_slot {
        Some(slot) => (parse_weekday_slot(slot)?, true),
        None => ((0..=6).collect(), false),
    };

    let (years, months, days_of_month, day_of_month_restricted) = match date_slot {
        Some(slot) => parse_date_slot(slot)?,
        None => ((MIN_YEAR..=MAX_YEAR).collect(), (1..=12).collect(), (1..=31).collect(), false),
    };

    let (hours, minutes, seconds) = match time_slot {
        Some(slot) => parse_time_slot(slot)?,
        None => (vec![0], vec![0], vec![0]),
    };

    let zone_name = zone_slot.map(str::to_string);

    Ok(Expression {
        seconds,
        minutes,
        hours,
        days_of_month,
        day_of_month_restricted,
        months,
        years,
        weekdays,
        weekday_restricted,
        zone_name,
    })
}

/// Like [`parse`], but panics on a [`ParseError`]. Intended for literal
/// expressions known to be valid ahead of time.
pub fn must_parse(input: &str) -> Expression {
    parse(input).unwrap_or_else(|err| panic!("invalid calendar event expression {input:?}: {err}"))
}

fn expand_shorthand(trimmed: &str) -> Option<String> {
    let expansion = match trimmed.to_ascii_lowercase().as_str() {
        "hourly" => "*-*-* *:00:00",
        "daily" => "*-*-* 00:00:00",
        "weekly" => "Mon *-*-* 00:00:00",
        "monthly" => "*-*-01 00:00:00",
        "yearly" | "annually" => "*-01-01 00:00:00",
        _ => return None,
    };
    Some(expansion.to_string())
}

/// A slot is a "weekday set" shape if it contains only ASCII letters,
/// commas, and `..`, and at least one letter — distinguishing it from a
/// date (`-`), a time (`:`), or a zone name (which, when ambiguous with a
/// bare alphabetic weekday list, is resolved by slot order per the spec).
fn is_weekday_shape(slot: &str) -> bool {
    slot.chars().any(|c| c.is_ascii_alphabetic())
        && slot.chars().all(|c| c.is_ascii_alphabetic() || c == ',' || c == '.')
}

fn take_first<'a>(slots: &mut [Option<&'a str>], pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    for slot in slots.iter_mut() {
        if let Some(s) = *slot {
            if pred(s) {
                *slot = None;
                return Some(s);
            }
        }
    }
    None
}

type ClassifiedSlots<'a> = (Option<&'a str>, Option<&'a str>, Option<&'a str>, Option<&'a str>);

fn classify_slots(tokens: Vec<&str>) -> Result<ClassifiedSlots<'_>> {
    // At most 4 tokens reach here (checked by the caller). The first three
    // takers below claim a slot by shape; the fourth claims at most one
    // remaining slot as the zone name. Anything still unclaimed after that
    // matches no recognized shape and is a parse error.
    let mut slots: Vec<Option<&str>> = tokens.into_iter().map(Some).collect();

    let weekday = take_first(&mut slots, is_weekday_shape);
    let date = take_first(&mut slots, |s| s.contains('-'));
    let time = take_first(&mut slots, |s| s.contains(':'));
    let zone = take_first(&mut slots, |_| true);

    if let Some(leftover) = slots.into_iter().flatten().next() {
        return Err(ParseError::MalformedSlot { slot: leftover.to_string() });
    }

    Ok((weekday, date, time, zone))
}

fn parse_weekday_slot(slot: &str) -> Result<Vec<u8>> {
    let values = parse_field_list(slot, WEEKDAY_DOMAIN, resolve_weekday)?;
    Ok(values.into_iter().map(|v| v as u8).collect())
}

/// Parse the `YEAR-MONTH-DOM` (or `MONTH-DOM`, year defaulted) date slot.
fn parse_date_slot(slot: &str) -> Result<(Vec<i16>, Vec<u8>, Vec<u8>, bool)> {
    let parts: Vec<&str> = slot.split('-').collect();
    let (year_part, month_part, day_part) = match parts.as_slice() {
        [month, day] => ("*", *month, *day),
        [year, month, day] => (*year, *month, *day),
        _ => return Err(ParseError::MalformedSlot { slot: slot.to_string() }),
    };

    let year_part = expand_two_digit_years(year_part);
    let day_of_month_restricted = day_part != "*";

    let years = parse_field_list(&year_part, YEAR_DOMAIN, no_names)?
        .into_iter()
        .map(|v| v as i16)
        .collect();
    let months = parse_field_list(month_part, MONTH_DOMAIN, resolve_month)?
        .into_iter()
        .map(|v| v as u8)
        .collect();
    let days_of_month = parse_field_list(day_part, DAY_DOMAIN, no_names)?
        .into_iter()
        .map(|v| v as u8)
        .collect();

    Ok((years, months, days_of_month, day_of_month_restricted))
}

fn parse_time_slot(slot: &str) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let parts: Vec<&str> = slot.split(':').collect();
    let (hour_part, minute_part, second_part) = match parts.as_slice() {
        [hour, minute] => (*hour, *minute, "00"),
        [hour, minute, second] => (*hour, *minute, *second),
        _ => return Err(ParseError::MalformedSlot { slot: slot.to_string() }),
    };

    let hours = parse_field_list(hour_part, HOUR_DOMAIN, no_names)?
        .into_iter()
        .map(|v| v as u8)
        .collect();
    let minutes = parse_field_list(minute_part, MINUTE_DOMAIN, no_names)?
        .into_iter()
        .map(|v| v as u8)
        .collect();
    let seconds = parse_field_list(second_part, SECOND_DOMAIN, no_names)?
        .into_iter()
        .map(|v| v as u8)
        .collect();

    Ok((hours, minutes, seconds))
}

/// Rewrite every maximal run of exactly two digits in a year field to its
/// `20YY` expansion (`spec.md` §4.1 point 3), leaving longer or shorter
/// digit runs (a 4-digit year, or a 1-digit typo caught later as an
/// out-of-range value) untouched.
fn expand_two_digit_years(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = String::with_capacity(field.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let run = &field[start..i];
            if run.len() == 2 {
                out.push_str("20");
            }
            out.push_str(run);
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hourly_expands() {
        let a = parse("hourly").unwrap();
        let b = parse("*-*-* *:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn weekly_expands() {
        let a = parse("weekly").unwrap();
        let b = parse("Mon *-*-* 00:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn shorthand_is_case_insensitive() {
        assert_eq!(parse("DAILY").unwrap(), parse("daily").unwrap());
    }

    #[test]
    fn bare_time_defaults_date_and_second() {
        let a = parse("05:40").unwrap();
        let b = parse("*-*-* 05:40:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn weekday_prefixes_and_ranges_collapse_to_same_set() {
        let a = parse("Sat,Thu,Mon..Wed,Sat..Sun").unwrap();
        let b = parse("Mon..Thu,Sat,Sun *-*-* 00:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn two_digit_year_expands() {
        let a = parse("24-06-15 00:00:00").unwrap();
        let b = parse("2024-06-15 00:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_slots_is_rejected() {
        assert!(matches!(
            parse("Mon 2024-01-01 00:00:00 UTC extra"),
            Err(ParseError::TooManySlots { found: 5 })
        ));
    }

    #[test]
    fn second_unclassifiable_slot_is_rejected_not_dropped() {
        // Two slots ("123", "456") match no shape; only one can be claimed
        // as the zone name, so the other must raise `MalformedSlot` rather
        // than being silently discarded.
        assert!(matches!(
            parse("123 456"),
            Err(ParseError::MalformedSlot { slot }) if slot == "456"
        ));
    }

    #[test]
    fn zone_is_stored_verbatim() {
        let expr = parse("*-*-* 00:00:00 America/Los_Angeles").unwrap();
        assert_eq!(expr.zone_name.as_deref(), Some("America/Los_Angeles"));
    }

    #[test]
    fn invalid_step_examples_are_rejected() {
        for bad in ["*:0/60", "*:0/61", "*:2/60", "*:2..20/61"] {
            assert!(parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn month_and_day_wildcards_default_unrestricted() {
        let expr = parse("05:40").unwrap();
        assert!(!expr.day_of_month_restricted);
        assert!(!expr.weekday_restricted);
    }

    #[test]
    fn explicit_day_of_month_is_restricted() {
        let expr = parse("2019-02..04-05").unwrap();
        assert!(expr.day_of_month_restricted);
        assert_eq!(expr.days_of_month, vec![5]);
        assert_eq!(expr.months, vec![2, 3, 4]);
        assert_eq!(expr.years, vec![2019]);
    }
}
