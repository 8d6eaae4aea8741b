//! Interfaces to the widgets a field drives but does not own: the calendar
//! popup and the keystroke filter.

use regex::Regex;

/// Configuration handed to a calendar popup when a type attaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarOptions {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: String,
    pub auto_close: bool,
    pub force_parse: bool,
    pub today_button: bool,
    pub today_highlight: bool,
    pub language: String,
}

pub trait Calendar: std::fmt::Debug {
    fn attach(&mut self, options: CalendarOptions);
    fn detach(&mut self);

    /// Options of the current attachment, if the calendar exposes them.
    fn options(&self) -> Option<&CalendarOptions> {
        None
    }

    fn is_attached(&self) -> bool {
        self.options().is_some()
    }
}

/// Calendar stand-in that only remembers how it was configured, for
/// embedders that render the popup themselves.
#[derive(Debug, Clone, Default)]
pub struct CalendarSlot {
    options: Option<CalendarOptions>,
}

impl Calendar for CalendarSlot {
    fn attach(&mut self, options: CalendarOptions) {
        self.options = Some(options);
    }

    fn detach(&mut self) {
        self.options = None;
    }

    fn options(&self) -> Option<&CalendarOptions> {
        self.options.as_ref()
    }
}

/// Keystroke filter: which characters may be typed, how many, and whether
/// they are upper-cased on the way in.
#[derive(Debug, Clone)]
pub struct KeyFilter {
    pattern: Regex,
    max_length: Option<usize>,
    uppercase: bool,
}

impl KeyFilter {
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            max_length: None,
            uppercase: false,
        }
    }

    /// Accepts any single character, line breaks included.
    pub fn any() -> Self {
        Self::new(Regex::new("(?s).").expect("dot pattern is valid"))
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    pub fn set_max(&mut self, max_length: usize) {
        self.max_length = Some(max_length);
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn uppercase(&self) -> bool {
        self.uppercase
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the character to insert after `current`, or `None` when the
    /// key is ignored.
    pub fn accept(&self, current: &str, ch: char) -> Option<char> {
        if self
            .max_length
            .is_some_and(|max| current.chars().count() >= max)
        {
            return None;
        }
        let mut buf = [0u8; 4];
        if !self.pattern.is_match(ch.encode_utf8(&mut buf)) {
            return None;
        }
        if self.uppercase {
            ch.to_uppercase().next()
        } else {
            Some(ch)
        }
    }

    /// Re-applies the filter to text that bypassed the keyboard.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = String::with_capacity(text.len());
        for ch in text.chars() {
            if let Some(accepted) = self.accept(&cleaned, ch) {
                cleaned.push(accepted);
            }
        }
        cleaned
    }
}
