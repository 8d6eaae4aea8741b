use tracing::debug;

use super::{Conflict, Field, FieldEvent, FieldTask, SetOptions, Status};

impl Field {
    /// Sets the stored value and makes it the clean baseline.
    pub fn set(&mut self, value: Option<&str>) {
        self.set_with(value, SetOptions::default());
    }

    /// Sets the stored value. `None` leaves the control text alone but still
    /// resets the baseline when `auto_clean` is on.
    pub fn set_with(&mut self, value: Option<&str>, options: SetOptions) {
        if options.auto_clean {
            self.prev_value = value.map(str::to_string);
            self.clear_dirty();
        }
        if self.has(Status::Error) {
            self.dismiss_error();
        }

        let display = value.map(|value| self.to_field(value));
        if let Some(text) = display.as_deref() {
            self.control.set_text(text);
        }
        if let Some(filter) = &self.filter {
            let cleaned = filter.clean(self.control.text());
            if cleaned != self.control.text() {
                self.control.set_text(&cleaned);
            }
        }

        self.events.push(FieldEvent::AfterSet {
            display,
            value: value.map(str::to_string),
        });
        self.redraw();
    }

    /// The stored representation of the control's current text.
    pub fn get(&self) -> String {
        let raw = self.control.text();
        match self.active_type.converter() {
            Some(converter) => converter.from_field(raw),
            None => raw.to_string(),
        }
    }

    /// Combined getter/setter: `None` reads, `Some` writes and returns `None`.
    pub fn value(&mut self, value: Option<&str>) -> Option<String> {
        match value {
            None => Some(self.get()),
            Some(value) => {
                self.set(Some(value));
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        let raw = self.control.text();
        self.active_type
            .is_empty(raw)
            .unwrap_or_else(|| raw.trim().is_empty())
    }

    /// Marks the field dirty on the first divergence from the baseline.
    /// While dirty, schedules (or pushes back) the check that notices the
    /// value has returned to the baseline.
    pub fn check_dirty(&mut self) {
        if self.dirty {
            self.timers.replace(
                &mut self.clean_check,
                self.config.clean_check_delay,
                FieldTask::CleanCheck,
            );
            return;
        }
        let current = self.get();
        if !same_value(self.prev_value.as_deref(), Some(&current)) {
            debug!(value = %current, "field became dirty");
            self.dirty = true;
            self.events.push(FieldEvent::Dirty);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drops the dirty flag and any pending clean check. Emits `Clean` only
    /// when the field was dirty.
    pub fn clear_dirty(&mut self) {
        if let Some(handle) = self.clean_check.take() {
            self.timers.cancel(handle);
        }
        if self.dirty {
            self.dirty = false;
            self.events.push(FieldEvent::Clean);
        }
    }

    /// Resets to the type's cleared value, or to empty, as the new baseline.
    pub fn clear(&mut self) {
        self.clear_dirty();
        let cleared = self.active_type.clear().unwrap_or_default();
        self.set(Some(&cleared));
    }

    /// Reports a clash between unsaved edits and `incoming`, a value pushed
    /// from elsewhere. Clean fields never conflict.
    pub fn conflicts(&self, incoming: &str) -> Option<Conflict> {
        self.dirty.then(|| Conflict {
            key: self.control.name().map(str::to_string),
            current: self.get(),
            incoming: incoming.to_string(),
        })
    }

    pub(super) fn run_clean_check(&mut self) {
        let current = self.get();
        if same_value(self.prev_value.as_deref(), Some(&current)) {
            debug!("field returned to its baseline");
            self.dirty = false;
            self.events.push(FieldEvent::Clean);
            self.redraw();
        }
    }

    fn to_field(&self, value: &str) -> String {
        match self.active_type.converter() {
            Some(converter) => converter.to_field(value),
            None => value.to_string(),
        }
    }
}

/// Missing and empty values compare equal.
fn same_value(left: Option<&str>, right: Option<&str>) -> bool {
    left.unwrap_or_default() == right.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::control::TextControl;
    use crate::options::{FieldConfig, FieldOptions};

    fn text_field() -> Field {
        let mut field = Field::builder(TextControl::new())
            .with_config(FieldConfig::default().with_clean_check_delay(Duration::from_millis(300)))
            .bind()
            .unwrap();
        field.drain_events();
        field
    }

    fn type_text(field: &mut Field, text: &str) {
        field.control_mut().set_text(text);
        field.on_keyup();
    }

    #[test]
    fn dirty_then_debounced_clean() {
        let mut field = text_field();
        type_text(&mut field, "a");
        assert!(field.is_dirty());
        assert_eq!(field.drain_events(), vec![FieldEvent::Dirty]);

        type_text(&mut field, "");
        field.advance(Duration::from_millis(100));
        type_text(&mut field, "");
        field.advance(Duration::from_millis(250));
        assert!(field.is_dirty(), "each keyup pushes the check back");

        field.advance(Duration::from_millis(50));
        assert!(!field.is_dirty());
        assert_eq!(field.drain_events(), vec![FieldEvent::Clean]);
    }

    #[test]
    fn clean_check_is_a_no_op_while_still_diverged() {
        let mut field = text_field();
        type_text(&mut field, "a");
        type_text(&mut field, "ab");
        field.advance(Duration::from_secs(1));
        assert!(field.is_dirty());
    }

    #[test]
    fn clear_dirty_only_reports_real_transitions() {
        let mut field = text_field();
        field.clear_dirty();
        assert!(field.drain_events().is_empty());

        type_text(&mut field, "x");
        field.drain_events();
        field.clear_dirty();
        assert_eq!(field.drain_events(), vec![FieldEvent::Clean]);
    }

    #[test]
    fn set_without_auto_clean_keeps_the_baseline() {
        let mut field = text_field();
        field.set_with(Some("draft"), SetOptions { auto_clean: false });
        assert_eq!(field.prev_value(), None);
        field.check_dirty();
        assert!(field.is_dirty());

        field.set(Some("saved"));
        assert!(!field.is_dirty());
        assert_eq!(field.prev_value(), Some("saved"));
    }

    #[test]
    fn after_set_carries_both_representations() {
        let mut field = text_field();
        field.set(Some("hi"));
        assert_eq!(
            field.drain_events(),
            vec![FieldEvent::AfterSet {
                display: Some("hi".into()),
                value: Some("hi".into()),
            }]
        );
    }

    #[test]
    fn legacy_value_accessor() {
        let mut field = text_field();
        assert_eq!(field.value(Some("abc")), None);
        assert_eq!(field.value(None).as_deref(), Some("abc"));
    }

    #[test]
    fn max_length_trims_set_values() {
        let mut field = Field::bind(TextControl::new(), FieldOptions::new().with_max(3)).unwrap();
        field.set(Some("abcdef"));
        assert_eq!(field.get(), "abc");
    }

    #[test]
    fn conflicts_only_when_dirty() {
        let mut field = Field::bind(TextControl::new().with_name("email"), FieldOptions::new())
            .unwrap();
        assert_eq!(field.conflicts("a@b.c"), None);
        type_text(&mut field, "me@x.y");
        let conflict = field.conflicts("a@b.c").unwrap();
        assert_eq!(conflict.key.as_deref(), Some("email"));
        assert_eq!(conflict.current, "me@x.y");
        assert_eq!(conflict.incoming, "a@b.c");
    }

    #[test]
    fn clear_resets_to_an_empty_baseline() {
        let mut field = text_field();
        type_text(&mut field, "abc");
        field.clear();
        assert!(field.is_empty());
        assert!(!field.is_dirty());
        assert_eq!(field.prev_value(), Some(""));
        assert!(!field.control().text().contains('a'));
    }
}
