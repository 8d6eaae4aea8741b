//! The `date` field type.
//!
//! Values are stored as `YYYY-MM-DD` and shown as `MM/DD/YYYY`. Bounds come
//! from the `minDate` / `maxDate` attributes, each either a plain date or an
//! offset expression (see [`offset`]) resolved once when the type is set
//! up. `noRounding` switches offset evaluation to plain arithmetic.

pub mod offset;

use std::any::Any;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use crate::collab::{CalendarOptions, KeyFilter};
use crate::error::FieldError;
use crate::options::Strings;

use super::{Converter, FieldType, TypeHost};
use offset::{DISPLAY_PATTERN, Rounding};

pub const MIN_DATE: &str = "minDate";
pub const MAX_DATE: &str = "maxDate";
pub const NO_ROUNDING: &str = "noRounding";

#[derive(Debug, Clone, Default)]
pub struct DateType {
    min_date: Option<NaiveDate>,
    max_date: Option<NaiveDate>,
    rounding: Rounding,
}

impl DateType {
    pub fn min_date(&self) -> Option<NaiveDate> {
        self.min_date
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.max_date
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    fn resolve_bound(&self, host: &TypeHost<'_>, attribute: &str) -> Option<NaiveDate> {
        let expr = host.attribute(attribute)?;
        let resolved = offset::resolve(expr, host.today(), self.rounding);
        if resolved.is_none() {
            warn!(attribute, expr, "ignoring date bound that is neither an offset nor a date");
        }
        resolved
    }

    fn in_bounds(&self, date: NaiveDate) -> bool {
        let after_min = self.min_date.is_none_or(|min| date >= min);
        let before_max = self.max_date.is_none_or(|max| date <= max);
        after_min && before_max
    }
}

impl FieldType for DateType {
    fn set_up(&mut self, host: &mut TypeHost<'_>) {
        self.rounding = if host.toggle_attribute(NO_ROUNDING) {
            Rounding::Exact
        } else {
            Rounding::Snap
        };
        self.min_date = self.resolve_bound(host, MIN_DATE);
        self.max_date = self.resolve_bound(host, MAX_DATE);

        host.set_placeholder(DISPLAY_PATTERN);

        let language = host.strings().language.clone();
        host.attach_calendar(CalendarOptions {
            start_date: self.min_date.map(offset::format_display),
            end_date: self.max_date.map(offset::format_display),
            format: DISPLAY_PATTERN.to_lowercase(),
            auto_close: true,
            force_parse: false,
            today_button: true,
            today_highlight: true,
            language,
        });

        let pattern = Regex::new("[0-9/]").expect("date key pattern");
        host.set_key_filter(
            KeyFilter::new(pattern)
                .with_max_length(DISPLAY_PATTERN.len())
                .with_uppercase(true),
        );
    }

    fn tear_down(&mut self, host: &mut TypeHost<'_>) {
        host.detach_calendar();
        host.clear_key_filter();
        host.restore_placeholder();
    }

    fn converter(&self) -> Option<&dyn Converter> {
        Some(self)
    }

    fn validate(&self, raw: &str, strings: &Strings) -> Option<Result<(), FieldError>> {
        let valid = offset::parse_display(raw).is_some_and(|date| self.in_bounds(date));
        Some(if valid {
            Ok(())
        } else {
            Err(FieldError::new(strings.invalid.clone()))
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Converter for DateType {
    fn to_field(&self, value: &str) -> String {
        offset::storage_to_display(value)
    }

    fn from_field(&self, raw: &str) -> String {
        offset::display_to_storage(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(min: Option<(i32, u32, u32)>, max: Option<(i32, u32, u32)>) -> DateType {
        let to_date = |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DateType {
            min_date: min.map(to_date),
            max_date: max.map(to_date),
            rounding: Rounding::Snap,
        }
    }

    #[test]
    fn validate_checks_shape_and_bounds() {
        let date = bounded(Some((2011, 1, 1)), Some((2016, 2, 29)));
        let strings = Strings::default();
        assert_eq!(date.validate("02/29/2016", &strings), Some(Ok(())));
        assert_eq!(date.validate("01/01/2011", &strings), Some(Ok(())));
        assert!(matches!(date.validate("03/01/2016", &strings), Some(Err(_))));
        assert!(matches!(date.validate("12/31/2010", &strings), Some(Err(_))));
        assert!(matches!(date.validate("2/3/2016", &strings), Some(Err(_))));
        let Some(Err(error)) = date.validate("13/01/2016", &strings) else {
            panic!("month 13 should be rejected");
        };
        assert_eq!(error.message, strings.invalid);
    }

    #[test]
    fn missing_bounds_are_open() {
        let date = bounded(None, None);
        assert_eq!(
            date.validate("01/01/1900", &Strings::default()),
            Some(Ok(()))
        );
    }

    #[test]
    fn converter_round_trips() {
        let date = DateType::default();
        let converter = date.converter().unwrap();
        for stored in ["2016-01-05", "2000-02-29", "1999-12-31"] {
            let shown = converter.to_field(stored);
            assert_eq!(converter.from_field(&shown), stored);
        }
        for shown in ["01/05/2016", "02/29/2000"] {
            let stored = converter.from_field(shown);
            assert_eq!(converter.to_field(&stored), shown);
        }
        assert_eq!(converter.to_field("01/05/2016"), "");
        assert_eq!(converter.from_field("2016-01-05"), "");
    }
}
