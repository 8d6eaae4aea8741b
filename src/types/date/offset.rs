//! Relative date expressions.
//!
//! An expression is a run of `[+-]<n><unit>` tokens (`d`, `w`, `m`, `y`,
//! any case), e.g. `+4d-5y`. Tokens apply to today from the largest unit to
//! the smallest; tokens sharing a unit keep their written order. Unless
//! rounding is off, each step snaps to the end of its unit when written
//! with `+` and to the start otherwise, so `-1y+1m-0m+5d` reads as
//! "February 6th of last year". The literal `0` is today, unrounded.
//!
//! A string without any token is taken as a `YYYY-MM-DD` date.

use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use regex::Regex;

/// Storage format, `YYYY-MM-DD`.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";
/// Display format, `MM/DD/YYYY`.
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y";
/// Display format as shown to users.
pub const DISPLAY_PATTERN: &str = "MM/DD/YYYY";

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([+-]?)(\d+)([dwmy])").expect("offset token pattern"));
static STORAGE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("storage date pattern"));
static DISPLAY_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("display date pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Snap to the start/end of each token's unit.
    #[default]
    Snap,
    /// Plain calendar arithmetic.
    Exact,
}

/// Ordered largest first, so sorting by unit gives application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Year,
    Month,
    Week,
    Day,
}

impl Unit {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter.to_ascii_lowercase().as_str() {
            "y" => Some(Unit::Year),
            "m" => Some(Unit::Month),
            "w" => Some(Unit::Week),
            "d" => Some(Unit::Day),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetToken {
    pub amount: i64,
    pub unit: Unit,
    /// Written with a leading `+`; such tokens round to the end of the unit.
    pub towards_end: bool,
}

/// Extracts the offset tokens of `expr` in written order. `None` when a
/// matched token cannot be read, e.g. a magnitude past `i64`.
pub fn tokens(expr: &str) -> Option<Vec<OffsetToken>> {
    TOKEN
        .captures_iter(expr)
        .map(|caps| {
            let sign = caps.get(1).map_or("", |m| m.as_str());
            let magnitude = caps.get(2)?.as_str().parse::<i64>().ok()?;
            let unit = Unit::from_letter(caps.get(3)?.as_str())?;
            let amount = if sign == "-" { -magnitude } else { magnitude };
            Some(OffsetToken {
                amount,
                unit,
                towards_end: sign == "+",
            })
        })
        .collect()
}

/// Resolves an offset expression or `YYYY-MM-DD` date against `today`.
/// Returns `None` for empty or unusable input.
pub fn resolve(expr: &str, today: NaiveDate, rounding: Rounding) -> Option<NaiveDate> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }
    if expr == "0" {
        return Some(today);
    }

    let mut offsets = tokens(expr)?;
    if offsets.is_empty() {
        return parse_storage(expr);
    }
    offsets.sort_by_key(|token| token.unit);

    offsets.iter().try_fold(today, |date, token| {
        let shifted = shift(date, token.amount, token.unit)?;
        match rounding {
            Rounding::Snap => snap(shifted, token.unit, token.towards_end),
            Rounding::Exact => Some(shifted),
        }
    })
}

/// [`resolve`], formatted for display.
pub fn parse_offset_date(expr: &str, today: NaiveDate, rounding: Rounding) -> Option<String> {
    resolve(expr, today, rounding).map(format_display)
}

pub fn parse_storage(value: &str) -> Option<NaiveDate> {
    if !STORAGE_SHAPE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, STORAGE_FORMAT).ok()
}

pub fn parse_display(value: &str) -> Option<NaiveDate> {
    if !DISPLAY_SHAPE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DISPLAY_FORMAT).ok()
}

pub fn format_storage(date: NaiveDate) -> String {
    date.format(STORAGE_FORMAT).to_string()
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// `YYYY-MM-DD` to `MM/DD/YYYY`; anything unparsable becomes `""`.
pub fn storage_to_display(value: &str) -> String {
    parse_storage(value).map(format_display).unwrap_or_default()
}

/// `MM/DD/YYYY` to `YYYY-MM-DD`; anything unparsable becomes `""`.
pub fn display_to_storage(value: &str) -> String {
    parse_display(value).map(format_storage).unwrap_or_default()
}

fn shift(date: NaiveDate, amount: i64, unit: Unit) -> Option<NaiveDate> {
    match unit {
        Unit::Day => {
            let days = Days::new(amount.unsigned_abs());
            if amount < 0 {
                date.checked_sub_days(days)
            } else {
                date.checked_add_days(days)
            }
        }
        Unit::Week => shift(date, amount.checked_mul(7)?, Unit::Day),
        Unit::Month => {
            let months = Months::new(u32::try_from(amount.unsigned_abs()).ok()?);
            if amount < 0 {
                date.checked_sub_months(months)
            } else {
                date.checked_add_months(months)
            }
        }
        Unit::Year => shift(date, amount.checked_mul(12)?, Unit::Month),
    }
}

fn snap(date: NaiveDate, unit: Unit, towards_end: bool) -> Option<NaiveDate> {
    match unit {
        Unit::Day => Some(date),
        Unit::Week => {
            let week = date.week(Weekday::Sun);
            Some(if towards_end {
                week.last_day()
            } else {
                week.first_day()
            })
        }
        Unit::Month => {
            let start = date.with_day(1)?;
            if towards_end {
                start
                    .checked_add_months(Months::new(1))?
                    .checked_sub_days(Days::new(1))
            } else {
                Some(start)
            }
        }
        Unit::Year => {
            if towards_end {
                NaiveDate::from_ymd_opt(date.year(), 12, 31)
            } else {
                NaiveDate::from_ymd_opt(date.year(), 1, 1)
            }
        }
    }
}
