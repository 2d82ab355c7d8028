//! The next-match engine: given a normalized [`Expression`] and a starting
//! instant, finds the earliest strictly-later matching instant.
//!
//! The search has two tiers. [`search_naive`] is the fast path: it walks the
//! year/month/day/hour/minute/second fields as plain civil (zone-free)
//! values, cascading a field's overflow into the next coarser field exactly
//! the way a cron-style scheduler would. [`disambiguate`] is the slow path:
//! it takes the fast path's civil candidate into the expression's actual
//! time zone and corrects for the two ways a timeline can misbehave there —
//! a spring-forward gap (the civil time never happens; skip to just after
//! the gap and re-search) or a fall-back fold (the civil time happens
//! twice; walk through both occurrences in order).

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::{Timestamp, ToSpan, Zoned};

use crate::expression::Expression;

/// How far past `from`'s year the search is allowed to range before giving
/// up and reporting no match, even though `years` itself may list values
/// far beyond this. Without a cap, an expression like `years = [9999]`
/// searched from year 1 would walk board-straight through nearly ten
/// thousand empty years before confirming "no match" or finding one.
const MAX_YEAR_LOOKAHEAD: i16 = 50;

/// The fixed instant `0001-01-01T00:00:00Z`: the earliest instant this
/// crate's search will ever consider, and a convenient "beginning of time"
/// starting point for callers with no natural `from` of their own.
pub fn zero_instant() -> Zoned {
    jiff::civil::date(1, 1, 1)
        .at(0, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .expect("the zero instant is always representable")
}

/// Whether `instant` denotes the same UTC moment as [`zero_instant`],
/// irrespective of the zone it's expressed in. `next`/`next_n` treat this as
/// the "absent from" sentinel and pass it through unchanged rather than
/// searching for a match (`spec.md` §8 property 4).
fn is_zero_instant(instant: &Zoned) -> bool {
    instant.timestamp() == zero_instant().timestamp()
}

impl Expression {
    /// The earliest instant strictly later than `from` that this
    /// expression matches, or `None` if none exists within the search
    /// horizon (or the expression's zone name cannot be resolved).
    pub fn next(&self, from: &Zoned) -> Option<Zoned> {
        let tz = self.resolve_zone(from)?;
        let from_in_tz = from.with_time_zone(tz.clone());
        let horizon_year = from_in_tz.date().year().saturating_add(MAX_YEAR_LOOKAHEAD);
        let min_instant = from.timestamp();

        // `from` may sit on the earlier pass of a folded civil time this
        // expression matches (a repeated span, e.g. a fall-back transition).
        // The later pass is then the very next match: nothing can fall
        // between two passes of the same civil date-time.
        if let Some(zoned) = fold_successor(self, &tz, from_in_tz.datetime(), min_instant) {
            return Some(zoned);
        }

        let mut floor = from_in_tz
            .datetime()
            .checked_add(1.second())
            .ok()?;

        loop {
            let naive = search_naive(self, floor, horizon_year)?;
            match disambiguate(&tz, naive, min_instant) {
                Resolution::Matched(zoned) => return Some(zoned),
                Resolution::Retry(next_floor) => floor = next_floor,
            }
        }
    }

    /// Up to `n` consecutive matches strictly after `from`, in chronological
    /// order. Shorter than `n` if the search horizon is exhausted first.
    pub fn next_n(&self, from: &Zoned, n: usize) -> Vec<Zoned> {
        if is_zero_instant(from) {
            return vec![from.clone()];
        }

        let mut out = Vec::with_capacity(n);
        let mut cursor = from.clone();
        for _ in 0..n {
            match self.next(&cursor) {
                Some(zoned) => {
                    cursor = zoned.clone();
                    out.push(zoned);
                }
                None => break,
            }
        }
        out
    }

    fn resolve_zone(&self, from: &Zoned) -> Option<TimeZone> {
        match &self.zone_name {
            Some(name) => TimeZone::get(name).ok(),
            None => Some(from.time_zone().clone()),
        }
    }
}

/// Smallest element of `values` that is `>= floor`. `values` is assumed
/// sorted ascending, as every [`Expression`] field is.
fn ceil<T: Copy + PartialOrd>(values: &[T], floor: T) -> Option<T> {
    values.iter().copied().find(|&v| v >= floor)
}

/// Walk `expr`'s fields forward from `floor` (inclusive) to the next civil
/// date-time they jointly match, treating every field as zone-free. Returns
/// `None` once the search would cross `horizon_year`.
fn search_naive(expr: &Expression, floor: DateTime, horizon_year: i16) -> Option<DateTime> {
    let mut year = floor.date().year();
    let mut month = floor.date().month() as u8;
    let mut day = floor.date().day() as u8;
    let mut hour = floor.time().hour() as u8;
    let mut minute = floor.time().minute() as u8;
    let mut second = floor.time().second() as u8;

    loop {
        let y = ceil(&expr.years, year)?;
        if y > horizon_year {
            return None;
        }
        if y != year {
            year = y;
            month = 1;
            day = 1;
            hour = 0;
            minute = 0;
            second = 0;
        }

        let Some(mo) = ceil(&expr.months, month) else {
            year += 1;
            month = 1;
            day = 1;
            hour = 0;
            minute = 0;
            second = 0;
            continue;
        };
        if mo != month {
            month = mo;
            day = 1;
            hour = 0;
            minute = 0;
            second = 0;
        }

        let days = expr.actual_days_of_month(year, month);
        let Some(d) = ceil(&days, day) else {
            month += 1;
            day = 1;
            hour = 0;
            minute = 0;
            second = 0;
            continue;
        };
        if d != day {
            day = d;
            hour = 0;
            minute = 0;
            second = 0;
        }

        let Some(h) = ceil(&expr.hours, hour) else {
            day += 1;
            hour = 0;
            minute = 0;
            second = 0;
            continue;
        };
        if h != hour {
            hour = h;
            minute = 0;
            second = 0;
        }

        let Some(mi) = ceil(&expr.minutes, minute) else {
            hour += 1;
            minute = 0;
            second = 0;
            continue;
        };
        if mi != minute {
            minute = mi;
            second = 0;
        }

        let Some(s) = ceil(&expr.seconds, second) else {
            minute += 1;
            second = 0;
            continue;
        };
        second = s;

        let date = jiff::civil::Date::new(year, month as i8, day as i8).ok()?;
        return Some(date.at(hour as i8, minute as i8, second as i8, 0));
    }
}

enum Resolution {
    Matched(Zoned),
    /// The civil candidate didn't survive contact with the zone; resume the
    /// fast-path search from this civil date-time instead.
    Retry(DateTime),
}

/// Resolve a zone-free civil candidate against `tz`, handling the gap and
/// fold cases a DST transition can produce, and enforcing that the result
/// is strictly later than `min`.
fn disambiguate(tz: &TimeZone, naive: DateTime, min: Timestamp) -> Resolution {
    let ambiguous = tz.to_ambiguous_zoned(naive);

    if ambiguous.is_gap() {
        let after_gap = ambiguous
            .compatible()
            .expect("a gap always resolves to the post-gap instant");
        return Resolution::Retry(after_gap.datetime());
    }

    if ambiguous.is_fold() {
        let earlier = ambiguous.earlier().expect("a fold has an earlier instant");
        if earlier.timestamp() > min {
            return Resolution::Matched(earlier);
        }
        let later = ambiguous.later().expect("a fold has a later instant");
        if later.timestamp() > min {
            return Resolution::Matched(later);
        }
        return Resolution::Retry(bump_one_second(naive));
    }

    let zoned = ambiguous
        .unambiguous()
        .expect("neither gap nor fold leaves only the unambiguous case");
    if zoned.timestamp() > min {
        Resolution::Matched(zoned)
    } else {
        Resolution::Retry(bump_one_second(naive))
    }
}

/// If `from_dt` is the earlier pass of a fold this expression matches, and
/// `from_dt`'s instant really is that earlier pass, return the later pass —
/// otherwise `None`.
fn fold_successor(
    expr: &Expression,
    tz: &TimeZone,
    from_dt: DateTime,
    min_instant: Timestamp,
) -> Option<Zoned> {
    let ambiguous = tz.to_ambiguous_zoned(from_dt);
    if !ambiguous.is_fold() || !matches_fields(expr, from_dt) {
        return None;
    }
    let earlier = ambiguous.earlier().ok()?;
    if earlier.timestamp() != min_instant {
        return None;
    }
    let later = ambiguous.later().ok()?;
    (later.timestamp() > min_instant).then_some(later)
}

fn matches_fields(expr: &Expression, dt: DateTime) -> bool {
    let year = dt.date().year();
    let month = dt.date().month() as u8;
    let day = dt.date().day() as u8;
    let hour = dt.time().hour() as u8;
    let minute = dt.time().minute() as u8;
    let second = dt.time().second() as u8;

    expr.years.contains(&year)
        && expr.months.contains(&month)
        && expr.actual_days_of_month(year, month).contains(&day)
        && expr.hours.contains(&hour)
        && expr.minutes.contains(&minute)
        && expr.seconds.contains(&second)
}

fn bump_one_second(dt: DateTime) -> DateTime {
    dt.checked_add(1.second())
        .expect("one second past any representable civil date-time stays representable")
}


#[cfg(test)]
mod properties {
    use crate::parser::must_parse;
    use jiff::tz::TimeZone;
    use proptest::prelude::*;

    fn sample_expressions() -> Vec<crate::Expression> {
        vec![
            must_parse("hourly"),
            must_parse("daily"),
            must_parse("weekly"),
            must_parse("Mon..Fri 08:30:00"),
            must_parse("*-*-01 00:00:00"),
            must_parse("*:*/15:00"),
        ]
    }

    proptest! {
        #[test]
        fn next_is_always_strictly_later(
            year in 1i16..=2100,
            month in 1u8..=12,
            day in 1u8..=28,
            hour in 0u8..=23,
            minute in 0u8..=59,
            second in 0u8..=59,
            expr_index in 0usize..6,
        ) {
            let from = jiff::civil::date(year, month as i8, day as i8)
                .at(hour as i8, minute as i8, second as i8, 0)
                .to_zoned(TimeZone::UTC)
                .unwrap();
            let expressions = sample_expressions();
            if let Some(next) = expressions[expr_index].next(&from) {
                prop_assert!(next.timestamp() > from.timestamp());
            }
        }

        #[test]
        fn next_n_is_strictly_increasing(
            year in 1i16..=2100,
            month in 1u8..=12,
            day in 1u8..=28,
            expr_index in 0usize..6,
        ) {
            let from = jiff::civil::date(year, month as i8, day as i8)
                .at(0, 0, 0, 0)
                .to_zoned(TimeZone::UTC)
                .unwrap();
            let expressions = sample_expressions();
            let seq = expressions[expr_index].next_n(&from, 5);
            for pair in seq.windows(2) {
                prop_assert!(pair[1].timestamp() > pair[0].timestamp());
            }
        }
    }
}
