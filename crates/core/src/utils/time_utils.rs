use chrono::{Datelike, Local, NaiveDate};

/// Today's date on the local clock. Export file names and the default report
/// year are derived from it.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The current calendar year on the local clock.
pub fn current_year() -> i32 {
    today().year()
}

/// The date part of a wire date, dropping any time component.
///
/// Handles both `"2024-01-05 10:30:00"` and `"2024-01-05T10:30:00"`.
pub fn date_only(value: &str) -> &str {
    let value = value.trim();
    match value.find([' ', 'T']) {
        Some(idx) => &value[..idx],
        None => value,
    }
}

/// The first four characters of the date part when they are digits, else `""`.
pub fn year_of(value: &str) -> &str {
    match date_only(value).get(..4) {
        Some(year) if year.bytes().all(|b| b.is_ascii_digit()) => year,
        _ => "",
    }
}
