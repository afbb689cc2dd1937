use chrono::{Duration, Local, NaiveDate};

use crate::input::InputError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolves user-typed dates relative to `today`.
///
/// Accepts `today`/`tod`, `yesterday`/`yes`, `tomorrow`/`tom`, signed offsets
/// (`-1d`, `+2d`, `-1w`) and ISO `YYYY-MM-DD`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, InputError> {
    let input = input.trim();
    let invalid = || InputError::InvalidDate(input.to_string());

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yes" => return Ok(shift_day(today, -1)),
        "tomorrow" | "tom" => return Ok(shift_day(today, 1)),
        _ => {}
    }

    if input.starts_with('+') || input.starts_with('-') {
        let offset = parse_offset(input).ok_or_else(invalid)?;
        return today.checked_add_signed(offset).ok_or_else(invalid);
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())
}

/// Longest chartable range, inclusive of both ends.
pub const MAX_RANGE_DAYS: i64 = 3660;

/// Resolves a `start end` pair for charting; rejects inverted or oversized spans.
pub fn parse_range(start: &str, end: &str, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), InputError> {
    let start = parse_date(start, today)?;
    let end = parse_date(end, today)?;
    if end < start {
        return Err(InputError::InvertedRange {
            start: format_date(start),
            end: format_date(end),
        });
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(InputError::RangeTooLong { days, max: MAX_RANGE_DAYS });
    }
    Ok((start, end))
}

/// Calendar-day step, as used by previous/next day navigation.
pub fn shift_day(date: NaiveDate, offset: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(offset)).unwrap_or(date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_offset(input: &str) -> Option<Duration> {
    if input.len() < 3 || !input.is_ascii() {
        return None;
    }
    let (num_str, unit) = input.split_at(input.len() - 1);
    let count: i64 = num_str.parse().ok()?;

    match unit.to_lowercase().as_str() {
        "d" => Some(Duration::days(count)),
        "w" => Some(Duration::weeks(count)),
        _ => None,
    }
}
