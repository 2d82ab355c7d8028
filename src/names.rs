//! Weekday and month name vocabularies and case-insensitive resolution.
//!
//! Weekday and month tokens are recognized either by their full English name
//! or by their three-letter prefix, both case-insensitively, per `spec.md`
//! §4.1 point 2. This mirrors the `abbr_strarr` const-fn abbreviation
//! technique already used for the `jcal` lineage's own month/weekday tables
//! (`src/lib.rs`), trimmed down to the Gregorian, Sunday-based vocabulary
//! this crate needs.

/// Sunday-based weekday names, index 0 = Sunday.
pub(crate) const WEEKDAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// Gregorian month names, index 0 = January.
pub(crate) const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_ABBR: [&str; 7] = abbr3(WEEKDAYS);
const MONTH_ABBR: [&str; 12] = abbr3(MONTHS);

/// Abbreviate every entry in `names` to its first three ASCII characters.
const fn abbr3<const N: usize>(names: [&str; N]) -> [&str; N] {
    let mut out = [""; N];
    let mut i = 0;
    while i < N {
        assert!(names[i].is_ascii() && names[i].len() >= 3, "name too short to abbreviate");
        // SAFETY: `names[i]` is ASCII and at least 3 bytes long, so byte 0..3 is valid UTF-8.
        out[i] = unsafe {
            std::str::from_utf8_unchecked(names[i].as_bytes().first_chunk::<3>().unwrap().as_slice())
        };
        i += 1;
    }
    out
}

fn resolve(token: &str, full: &[&str], abbr: &[&str]) -> Option<i64> {
    if !token.is_ascii() {
        return None;
    }
    full.iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .or_else(|| abbr.iter().position(|name| name.eq_ignore_ascii_case(token)))
        .map(|i| i as i64)
}

/// Resolve a weekday token (full name or three-letter abbreviation) to its
/// Sunday-based index in `[0, 6]`.
pub(crate) fn resolve_weekday(token: &str) -> Option<i64> {
    resolve(token, &WEEKDAYS, &WEEKDAY_ABBR)
}

/// Resolve a month token (full name or three-letter abbreviation) to its
/// one-based index in `[1, 12]`.
pub(crate) fn resolve_month(token: &str) -> Option<i64> {
    resolve(token, &MONTHS, &MONTH_ABBR).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_abbreviations_match_full_names() {
        assert_eq!(resolve_weekday("sun"), Some(0));
        assert_eq!(resolve_weekday("Mon"), Some(1));
        assert_eq!(resolve_weekday("SAT"), Some(6));
        assert_eq!(resolve_weekday("Sunday"), Some(0));
        assert_eq!(resolve_weekday("saturday"), Some(6));
        assert_eq!(resolve_weekday("bla"), None);
    }

    #[test]
    fn month_abbreviations_match_full_names() {
        assert_eq!(resolve_month("jan"), Some(1));
        assert_eq!(resolve_month("Dec"), Some(12));
        assert_eq!(resolve_month("december"), Some(12));
        assert_eq!(resolve_month("xyz"), None);
    }
}
