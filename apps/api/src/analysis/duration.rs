//! Rule-based experience duration.
//!
//! Only `Month Year – Month Year` ranges that parse and pass the sanity bound count.
//! Semantic estimates of years never feed this figure.

use chrono::Month;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::scoring::round_to;

static DATE_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z]{3,9} \d{4})\s*[–-]\s*([A-Za-z]{3,9} \d{4})")
        .expect("valid date range regex")
});

/// Exclusive upper bound on a single range, in months (50 years).
pub const MAX_RANGE_MONTHS: i64 = 600;

/// A calendar month as `(year, month)` with month in 1..=12.
pub type YearMonth = (i32, u32);

/// Parses "Jan 2020", "january 2020" or "Sept 2020".
pub fn parse_month_year(text: &str) -> Option<YearMonth> {
    let (month_word, year) = text.trim().split_once(' ')?;
    let month = month_number(month_word)?;
    let year = year.trim().parse::<i32>().ok()?;
    Some((year, month))
}

fn month_number(word: &str) -> Option<u32> {
    if word.eq_ignore_ascii_case("sept") {
        return Some(9);
    }
    word.parse::<Month>().ok().map(|m| m.number_from_month())
}

pub fn month_delta(start: YearMonth, end: YearMonth) -> i64 {
    (end.0 as i64 - start.0 as i64) * 12 + (end.1 as i64 - start.1 as i64)
}

/// The delta when it lies strictly inside (0, 600) months; inverted, empty and
/// implausibly long ranges are discarded.
pub fn accepted_delta(start: YearMonth, end: YearMonth) -> Option<i64> {
    let delta = month_delta(start, end);
    (delta > 0 && delta < MAX_RANGE_MONTHS).then_some(delta)
}

/// Total accepted months across all ranges in `text`, in years rounded to one decimal.
pub fn extract_duration(text: &str) -> f64 {
    let total_months: i64 = DATE_RANGE_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let start = parse_month_year(&caps[1])?;
            let end = parse_month_year(&caps[2])?;
            accepted_delta(start, end)
        })
        .sum();

    round_to(total_months as f64 / 12.0, 1)
}
