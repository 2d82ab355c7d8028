//! The shared "atom / range / step / list" grammar used by every numeric
//! field (seconds, minutes, hours, day-of-month, month, year, weekday).
//!
//! ```text
//! field   := atom ("," atom)*
//! atom    := "*" step?
//!          | value step?
//!          | value ".." value step?
//! step    := "/" positive-integer
//! value   := integer | name    (name resolution is field-specific)
//! ```

use crate::error::{ParseError, Result};

/// The inclusive domain a field's values must fall in, plus its name for
/// error messages.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Domain {
    pub name: &'static str,
    pub min: i64,
    pub max: i64,
}

impl Domain {
    pub(crate) const fn size(&self) -> i64 {
        self.max - self.min + 1
    }
}

/// Parse a whole field (a comma-separated list of atoms) into a sorted,
/// deduplicated list of values within `domain`.
///
/// `resolve_name` is consulted for tokens that do not parse as a plain
/// non-negative integer (weekday/month names); fields with no names simply
/// pass a resolver that always returns `None`.
pub(crate) fn parse_field_list(
    field: &str,
    domain: Domain,
    resolve_name: impl Fn(&str) -> Option<i64>,
) -> Result<Vec<i64>> {
    let mut values = Vec::new();
    for atom in field.split(',') {
        parse_atom(atom, domain, &resolve_name, &mut values)?;
    }
    values.sort_unstable();
    values.dedup();
    Ok(values)
}

fn parse_atom(
    atom: &str,
    domain: Domain,
    resolve_name: &impl Fn(&str) -> Option<i64>,
    out: &mut Vec<i64>,
) -> Result<()> {
    if let Some(step_str) = atom.strip_prefix("*/") {
        let step = parse_step(step_str, domain)?;
        push_stepped(domain.min, domain.max, step, domain, out);
        return Ok(());
    }
    if atom == "*" {
        out.extend(domain.min..=domain.max);
        return Ok(());
    }

    // `value` or `value..value`, each optionally followed by `/step`.
    let (range_part, step_part) = match atom.split_once('/') {
        Some((r, s)) => (r, Some(s)),
        None => (atom, None),
    };

    let (start, end) = match range_part.split_once("..") {
        Some((a, b)) => {
            let start = parse_value(a, domain, resolve_name)?;
            let end = parse_value(b, domain, resolve_name)?;
            if start > end {
                return Err(ParseError::EmptyRange {
                    field: domain.name,
                    start,
                    end,
                });
            }
            (start, end)
        }
        None => {
            let value = parse_value(range_part, domain, resolve_name)?;
            (value, value)
        }
    };

    match step_part {
        Some(step_str) => {
            let step = parse_step(step_str, domain)?;
            push_stepped(start, end, step, domain, out);
        }
        None => out.extend(start..=end),
    }

    Ok(())
}

fn parse_step(step_str: &str, domain: Domain) -> Result<i64> {
    let step: i64 = step_str
        .parse()
        .map_err(|_| ParseError::InvalidStep { field: domain.name, step: -1 })?;
    if step == 0 || step >= domain.size() {
        return Err(ParseError::InvalidStep { field: domain.name, step });
    }
    Ok(step)
}

fn push_stepped(start: i64, end: i64, step: i64, domain: Domain, out: &mut Vec<i64>) {
    let mut v = start;
    while v <= end {
        if (domain.min..=domain.max).contains(&v) {
            out.push(v);
        }
        v += step;
    }
}

fn parse_value(
    token: &str,
    domain: Domain,
    resolve_name: &impl Fn(&str) -> Option<i64>,
) -> Result<i64> {
    let value = match token.parse::<i64>() {
        Ok(v) => v,
        Err(_) => resolve_name(token).ok_or_else(|| ParseError::UnknownToken {
            kind: domain.name,
            token: token.to_string(),
        })?,
    };
    if value < domain.min || value > domain.max {
        return Err(ParseError::OutOfRange {
            field: domain.name,
            value,
            domain: (domain.min, domain.max),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Domain = Domain { name: "second", min: 0, max: 59 };
    const NONE: fn(&str) -> Option<i64> = |_| None;

    #[test]
    fn wildcard_is_full_domain() {
        let v = parse_field_list("*", SECOND, NONE).unwrap();
        assert_eq!(v, (0..=59).collect::<Vec<_>>());
    }

    #[test]
    fn single_value() {
        assert_eq!(parse_field_list("5", SECOND, NONE).unwrap(), vec![5]);
    }

    #[test]
    fn range() {
        assert_eq!(parse_field_list("2..5", SECOND, NONE).unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn list_of_atoms_dedup_and_sort() {
        assert_eq!(
            parse_field_list("5,2,2..4", SECOND, NONE).unwrap(),
            vec![2, 3, 4, 5]
        );
    }

    #[test]
    fn step_from_wildcard() {
        assert_eq!(
            parse_field_list("*/20", SECOND, NONE).unwrap(),
            vec![0, 20, 40]
        );
    }

    #[test]
    fn step_from_single_value() {
        assert_eq!(
            parse_field_list("10/20", SECOND, NONE).unwrap(),
            vec![10, 30, 50]
        );
    }

    #[test]
    fn step_from_range() {
        assert_eq!(
            parse_field_list("2..20/6", SECOND, NONE).unwrap(),
            vec![2, 8, 14, 20]
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            parse_field_list("5..2", SECOND, NONE),
            Err(ParseError::EmptyRange { .. })
        ));
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            parse_field_list("*/0", SECOND, NONE),
            Err(ParseError::InvalidStep { .. })
        ));
    }

    #[test]
    fn step_equal_to_domain_size_is_rejected() {
        assert!(matches!(
            parse_field_list("*/60", SECOND, NONE),
            Err(ParseError::InvalidStep { .. })
        ));
        assert!(matches!(
            parse_field_list("2/60", SECOND, NONE),
            Err(ParseError::InvalidStep { .. })
        ));
        assert!(matches!(
            parse_field_list("2..20/61", SECOND, NONE),
            Err(ParseError::InvalidStep { .. })
        ));
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        assert!(matches!(
            parse_field_list("60", SECOND, NONE),
            Err(ParseError::OutOfRange { .. })
        ));
    }
}
