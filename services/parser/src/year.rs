//! Year resolution for heterogeneous order-date encodings.
//!
//! Resolution order (first success wins):
//! 1. explicit `Year` column
//! 2. general date parsing of the first present date alias (4-digit years,
//!    or month-first `m/d/yy` with 00-49 as 20xx)
//! 3. `YYYY-...` prefix, then `.../.../YYYY` suffix
//! 4. [`DEFAULT_YEAR`]
//!
//! Rows are never dropped for a bad date: they land in the default year.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::record::{FieldValue, RawRecord};

pub const DEFAULT_YEAR: i32 = 2016;

pub const YEAR_COLUMNS: &[&str] = &["Year"];
pub const DATE_COLUMNS: &[&str] = &["Order Date", "OrderDate", "Date"];

/// Formats tried by general date parsing. Slash dates are month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

/// Resolve the year of a raw record. Total: always returns a year.
pub fn resolve_year(record: &RawRecord) -> i32 {
    if let Some(year) = explicit_year(record) {
        return year;
    }

    let date = match record.first_truthy(DATE_COLUMNS).and_then(FieldValue::as_text) {
        Some(d) => d,
        None => return DEFAULT_YEAR,
    };

    year_from_date_str(&date).unwrap_or(DEFAULT_YEAR)
}

fn explicit_year(record: &RawRecord) -> Option<i32> {
    let value = record.first_truthy(YEAR_COLUMNS)?;
    let year = match value {
        FieldValue::Number(n) => n.trunc() as i32,
        FieldValue::Text(s) => s.trim().parse::<i32>().ok()?,
        _ => return None,
    };
    (year != 0).then_some(year)
}

/// Year of a date string, or `None` if no rule applies.
pub fn year_from_date_str(raw: &str) -> Option<i32> {
    let date_str = raw.trim();

    if let Some(year) = parse_general(date_str) {
        return Some(year);
    }

    // 2016-11-08
    if date_str.contains('-') {
        if let Some(year) = date_str.split('-').next().and_then(four_digit_year) {
            return Some(year);
        }
    }

    // 01/03/2015
    if date_str.contains('/') {
        if let Some(year) = date_str.split('/').nth(2).and_then(four_digit_year) {
            return Some(year);
        }
    }

    None
}

fn parse_general(s: &str) -> Option<i32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return non_zero(dt.year());
    }

    // 2015
    if let Some(year) = four_digit_year(s) {
        return Some(year);
    }

    // chrono's %Y also takes 1-3 digits; only a 4-digit year run counts
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if has_year_run(s, dt.year()) {
                return non_zero(dt.year());
            }
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if has_year_run(s, d.year()) {
                return non_zero(d.year());
            }
        }
    }

    two_digit_year(s)
}

/// True when `s` holds `year` as a standalone run of exactly four digits.
fn has_year_run(s: &str, year: i32) -> bool {
    s.split(|c: char| !c.is_ascii_digit())
        .any(|run| run.len() == 4 && run.parse::<i32>().ok() == Some(year))
}

/// Month-first `m/d/yy` or `m-d-yy`. 00-49 is 20xx, 50-99 is 19xx.
fn two_digit_year(s: &str) -> Option<i32> {
    let sep = if s.contains('/') { '/' } else { '-' };
    let parts: Vec<&str> = s.split(sep).collect();
    let [month, day, yy] = parts.as_slice() else {
        return None;
    };
    if yy.len() != 2 || !yy.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let yy: i32 = yy.parse().ok()?;
    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    NaiveDate::from_ymd_opt(year, month.trim().parse().ok()?, day.trim().parse().ok()?)?;
    Some(year)
}

fn four_digit_year(segment: &str) -> Option<i32> {
    if segment.chars().count() != 4 {
        return None;
    }
    segment.parse::<i32>().ok().and_then(non_zero)
}

fn non_zero(year: i32) -> Option<i32> {
    (year != 0).then_some(year)
}
