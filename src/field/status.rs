use crate::decoration::LayerKind;

use super::{Field, FieldEvent, Status};

impl Field {
    /// Sets a status flag by name, announcing the change. Unknown names and
    /// unchanged values do nothing; returns whether the flag changed.
    pub fn status(&mut self, name: &str, value: bool) -> bool {
        self.status_with(name, value, true)
    }

    pub fn status_with(&mut self, name: &str, value: bool, fire_events: bool) -> bool {
        match Status::parse(name) {
            Some(status) => self.apply_status(status, value, fire_events),
            None => {
                tracing::debug!(name, "ignoring unknown status");
                false
            }
        }
    }

    pub fn has_status(&self, name: &str) -> bool {
        Status::parse(name).is_some_and(|status| self.has(status))
    }

    pub fn has(&self, status: Status) -> bool {
        self.states.get(&status).copied().unwrap_or(false)
    }

    /// All flags in declaration order.
    pub fn statuses(&self) -> impl Iterator<Item = (Status, bool)> + '_ {
        self.states.iter().map(|(status, value)| (*status, *value))
    }

    pub fn enable(&mut self) {
        self.apply_status(Status::Disabled, false, true);
    }

    pub fn disable(&mut self) {
        self.apply_status(Status::Disabled, true, true);
    }

    pub fn is_disabled(&self) -> bool {
        self.has(Status::Disabled)
    }

    /// Syncs decoration visibility with the field state: prefix and suffix
    /// only around content, the error add-in only while in error, the notice
    /// only without one, the placeholder only over an empty control.
    pub fn redraw(&mut self) {
        let has_content = !self.control.text().is_empty();
        let has_error = self.has(Status::Error);

        for id in [self.decorations.prefix(), self.decorations.suffix()]
            .into_iter()
            .flatten()
        {
            self.decorations.toggle_add_in(id, Some(has_content));
        }
        if let Some(id) = self.decorations.error() {
            self.decorations.toggle_add_in(id, Some(has_error));
        }
        self.decorations
            .set_layer_visible(LayerKind::Notice, !has_error);
        self.decorations
            .set_layer_visible(LayerKind::Placeholder, !has_content);
    }

    pub(crate) fn apply_status(&mut self, status: Status, value: bool, fire_events: bool) -> bool {
        if self.has(status) == value {
            return false;
        }
        self.states.insert(status, value);
        self.redraw();
        if fire_events {
            self.events.push(FieldEvent::StatusUpdate { status, value });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Control, TextControl};
    use crate::decoration::LayerKind;
    use crate::options::FieldOptions;

    fn field(options: FieldOptions) -> Field {
        let mut field = Field::bind(TextControl::new(), options).unwrap();
        field.drain_events();
        field
    }

    #[test]
    fn repeated_status_is_a_no_op() {
        let mut field = field(FieldOptions::new());
        assert!(field.status("warn", true));
        assert!(!field.status("warn", true));
        assert_eq!(
            field.drain_events(),
            vec![FieldEvent::StatusUpdate {
                status: Status::Warn,
                value: true,
            }]
        );
    }

    #[test]
    fn unknown_names_are_ignored() {
        let mut field = field(FieldOptions::new());
        assert!(!field.status("sparkly", true));
        assert!(!field.has_status("sparkly"));
        assert!(field.drain_events().is_empty());
    }

    #[test]
    fn disable_alias_and_silent_updates() {
        let mut field = field(FieldOptions::new());
        assert!(field.status_with("disable", true, false));
        assert!(field.is_disabled());
        assert!(field.has_status("disabled"));
        assert!(field.drain_events().is_empty());

        field.enable();
        assert!(!field.is_disabled());
        assert_eq!(field.drain_events().len(), 1);
    }

    #[test]
    fn redraw_tracks_content_and_is_idempotent() {
        let mut field = field(
            FieldOptions::new()
                .with_prefix("$")
                .with_suffix("kg")
                .with_placeholder("weight"),
        );
        let prefix = field.decorations().prefix().unwrap();
        let suffix = field.decorations().suffix().unwrap();
        let visible = |field: &Field, id| field.decorations().get(id).unwrap().is_visible();

        assert!(!visible(&field, prefix));
        assert!(!visible(&field, suffix));
        assert_eq!(field.decorations().placeholder_view(), Some("weight"));

        field.control_mut().set_text("12");
        field.redraw();
        let width = field.decorations().input_width();
        let outer = field.decorations().outer_width();
        field.redraw();
        assert!(visible(&field, prefix));
        assert!(visible(&field, suffix));
        assert_eq!(field.decorations().placeholder_view(), None);
        assert_eq!(field.decorations().input_width(), width);
        assert_eq!(field.decorations().outer_width(), outer);
    }

    #[test]
    fn notice_hides_while_in_error() {
        let mut field = field(FieldOptions {
            notice: Some("Saved automatically".into()),
            ..FieldOptions::new().with_required(true)
        });
        let notice_visible =
            |field: &Field| field.decorations().layer(LayerKind::Notice).unwrap().is_visible();
        field.redraw();
        assert!(notice_visible(&field));
        field.validate(false);
        assert!(!notice_visible(&field));
    }
}
