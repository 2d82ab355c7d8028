//! The parsed, immutable representation of a calendar event expression.

use jiff::civil;

/// A fully-normalized calendar event expression.
///
/// Every field is sorted, deduplicated, and within its domain — see the
/// crate-level documentation for the grammar that produces one of these via
/// [`crate::parse`]. `Expression` is a plain value: cheap to clone, safe to
/// share across threads, and read without synchronization by
/// [`Expression::next`]/[`Expression::next_n`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expression {
    pub(crate) seconds: Vec<u8>,
    pub(crate) minutes: Vec<u8>,
    pub(crate) hours: Vec<u8>,
    pub(crate) days_of_month: Vec<u8>,
    pub(crate) day_of_month_restricted: bool,
    pub(crate) months: Vec<u8>,
    pub(crate) years: Vec<i16>,
    pub(crate) weekdays: Vec<u8>,
    pub(crate) weekday_restricted: bool,
    /// Verbatim zone name from the surface syntax, if any. Resolved through
    /// the calendar service lazily, at match time (see [`Expression::next`]),
    /// since an unresolvable name is not a parse error — it degrades `next`
    /// to `None` instead.
    pub(crate) zone_name: Option<String>,
}

/// The lowest year this crate will ever place in `Expression::years` or
/// search through, matching the lowest civil year `jiff` can represent
/// without running into its `-9999` floor.
pub(crate) const MIN_YEAR: i16 = 1;

/// The highest year `Expression::years` materializes a wildcard to, and the
/// highest `jiff::civil::Date` can represent.
pub(crate) const MAX_YEAR: i16 = 9999;

impl Expression {
    /// Days in `(year, month)` intersected with `days_of_month`, further
    /// intersected with `weekdays` when the weekday field is restricted,
    /// per the "actual days of month" derivation (see crate docs).
    ///
    /// Day-of-month and weekday restrictions are intersected, not unioned:
    /// this dialect does not follow cron's "either field matches" rule.
    pub(crate) fn actual_days_of_month(&self, year: i16, month: u8) -> Vec<u8> {
        let days_in_month = days_in_month(year, month);

        let by_day_of_month: Vec<u8> = if self.day_of_month_restricted {
            self.days_of_month
                .iter()
                .copied()
                .filter(|&d| d <= days_in_month)
                .collect()
        } else {
            (1..=days_in_month).collect()
        };

        if !self.weekday_restricted {
            return by_day_of_month;
        }

        let by_weekday: Vec<u8> = (1..=days_in_month)
            .filter(|&d| self.weekdays.contains(&weekday_of(year, month, d)))
            .collect();

        if self.day_of_month_restricted {
            by_day_of_month
                .into_iter()
                .filter(|d| by_weekday.contains(d))
                .collect()
        } else {
            by_weekday
        }
    }
}

/// Number of days in `(year, month)`, leap years included.
pub(crate) fn days_in_month(year: i16, month: u8) -> u8 {
    civil::Date::new(year, month as i8, 1)
        .expect("year/month within civil::Date's representable range")
        .last_of_month()
        .day() as u8
}

/// Sunday-based weekday (`0` = Sunday) of `(year, month, day)`.
pub(crate) fn weekday_of(year: i16, month: u8, day: u8) -> u8 {
    civil::Date::new(year, month as i8, day as i8)
        .expect("actual_days_of_month only evaluates in-range days")
        .weekday()
        .to_sunday_zero_offset() as u8
}
