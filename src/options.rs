use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declarative settings for one field, the counterpart of the data
/// attributes a control carries. Loadable from JSON/YAML/TOML documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub label: Option<String>,
    pub require: bool,
    /// Legacy spelling of `require`.
    pub required: bool,
    pub placeholder: Option<String>,
    /// Legacy spelling of `placeholder`.
    pub empty: Option<String>,
    pub max: Option<usize>,
    pub preinput: Option<String>,
    pub postinput: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub tooltip: Option<String>,
    pub notice: Option<String>,
    pub width: Option<usize>,
    /// Type specific settings, e.g. `minDate` / `maxDate` / `noRounding`
    /// for the `date` type.
    pub attributes: IndexMap<String, String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.require = required;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.require || self.required
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.empty.as_deref().filter(|text| !text.is_empty()))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Presence flag: set unless missing or spelled `false`.
    pub fn toggle_attribute(&self, key: &str) -> bool {
        self.attributes
            .get(key)
            .is_some_and(|value| !value.trim().eq_ignore_ascii_case("false"))
    }
}

/// Localized strings a field shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    pub language: String,
    pub required: String,
    pub invalid: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            required: "Required".to_string(),
            invalid: "Invalid".to_string(),
        }
    }
}

/// Source of "today" for relative date resolution.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Runtime behaviour shared by fields: timings, strings and the clock.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub validate_delay: Duration,
    pub clean_check_delay: Duration,
    pub flash_interval: Duration,
    pub default_width: usize,
    pub(crate) strings: Arc<Strings>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            validate_delay: Duration::ZERO,
            clean_check_delay: Duration::from_millis(300),
            flash_interval: Duration::from_millis(150),
            default_width: 20,
            strings: Arc::new(Strings::default()),
            clock: Arc::new(SystemClock),
        }
    }
}

impl FieldConfig {
    pub fn with_validate_delay(mut self, delay: Duration) -> Self {
        self.validate_delay = delay;
        self
    }

    pub fn with_clean_check_delay(mut self, delay: Duration) -> Self {
        self.clean_check_delay = delay;
        self
    }

    pub fn with_flash_interval(mut self, interval: Duration) -> Self {
        self.flash_interval = interval;
        self
    }

    pub fn with_default_width(mut self, width: usize) -> Self {
        self.default_width = width;
        self
    }

    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.strings = Arc::new(strings);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Pins "today" to a fixed date.
    pub fn with_today(self, today: NaiveDate) -> Self {
        self.with_clock(FixedClock(today))
    }

    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
