use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// The kind of raw control a field wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Input,
    Select,
    Textarea,
    Submit,
}

impl ControlKind {
    pub fn is_bindable(self) -> bool {
        !matches!(self, ControlKind::Submit)
    }
}

impl std::fmt::Display for ControlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ControlKind::Input => "input",
            ControlKind::Select => "select",
            ControlKind::Textarea => "textarea",
            ControlKind::Submit => "submit",
        };
        f.write_str(name)
    }
}

/// A bindable control: the embedding environment's raw text holder.
pub trait Control: std::fmt::Debug {
    fn kind(&self) -> ControlKind;
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);

    /// Initial value declared on the control, pulled in once when the field
    /// is bound.
    fn value_attribute(&self) -> Option<&str> {
        None
    }

    fn name(&self) -> Option<&str> {
        None
    }
}

/// Headless control backed by a string buffer.
#[derive(Debug, Clone)]
pub struct TextControl {
    kind: ControlKind,
    name: Option<String>,
    value_attribute: Option<String>,
    buffer: String,
}

impl Default for TextControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TextControl {
    pub fn new() -> Self {
        Self {
            kind: ControlKind::Input,
            name: None,
            value_attribute: None,
            buffer: String::new(),
        }
    }

    pub fn with_kind(mut self, kind: ControlKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares the initial value; the buffer is seeded with it as well.
    pub fn with_value_attribute(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.buffer = value.clone();
        self.value_attribute = Some(value);
        self
    }
}

impl Control for TextControl {
    fn kind(&self) -> ControlKind {
        self.kind
    }

    fn text(&self) -> &str {
        &self.buffer
    }

    fn set_text(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
    }

    fn value_attribute(&self) -> Option<&str> {
        self.value_attribute.as_deref()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Buffer edit produced by a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyEdit {
    Insert(char),
    Backspace,
    Clear,
}

impl KeyEdit {
    pub(crate) fn from_key(key: &KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return None;
                }
                Some(KeyEdit::Insert(ch))
            }
            KeyCode::Backspace => Some(KeyEdit::Backspace),
            KeyCode::Delete => Some(KeyEdit::Clear),
            _ => None,
        }
    }

    pub(crate) fn apply(self, buffer: &mut String) {
        match self {
            KeyEdit::Insert(ch) => buffer.push(ch),
            KeyEdit::Backspace => {
                buffer.pop();
            }
            KeyEdit::Clear => buffer.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_attribute_seeds_buffer() {
        let control = TextControl::new()
            .with_name("dob")
            .with_value_attribute("2016-01-05");
        assert_eq!(control.text(), "2016-01-05");
        assert_eq!(control.value_attribute(), Some("2016-01-05"));
        assert_eq!(control.name(), Some("dob"));
    }

    #[test]
    fn control_chords_do_not_edit() {
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(KeyEdit::from_key(&ctrl_a), None);

        let mut buffer = String::from("ab");
        KeyEdit::from_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
            .unwrap()
            .apply(&mut buffer);
        assert_eq!(buffer, "a");
        KeyEdit::from_key(&KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE))
            .unwrap()
            .apply(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn submit_controls_are_not_bindable() {
        assert!(!ControlKind::Submit.is_bindable());
        assert!(ControlKind::Textarea.is_bindable());
    }
}
