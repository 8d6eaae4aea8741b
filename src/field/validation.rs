use crate::error::FieldError;

use super::{AutoValidate, Field, Status};

impl Field {
    /// Runs the required check (unless `skip_required`) and the type's
    /// validator, updating the error state. Returns whether the field is
    /// valid.
    pub fn validate(&mut self, skip_required: bool) -> bool {
        let empty = self.is_empty();
        if empty && !skip_required && self.has(Status::Require) {
            let message = self.config.strings.required.clone();
            self.set_error(Some(FieldError::new(message)));
            return false;
        }
        if empty {
            self.clear_error();
            return true;
        }

        match self
            .active_type
            .validate(self.control.text(), &self.config.strings)
        {
            Some(Err(error)) => {
                self.set_error(Some(error));
                false
            }
            Some(Ok(())) | None => {
                self.clear_error();
                true
            }
        }
    }

    /// Shows `error` in the error add-in and switches to validating on every
    /// keyup. `None` clears.
    pub fn set_error(&mut self, error: Option<FieldError>) {
        let Some(error) = error else {
            self.clear_error();
            return;
        };
        let add_in = self.decorations.ensure_error();
        if !error.message.is_empty() {
            self.decorations.set_content(add_in, error.message.as_str());
        }
        tracing::debug!(%error, "field error");
        self.error = Some(error);
        self.auto_validate = AutoValidate::Keyup;
        if !self.apply_status(Status::Error, true, true) {
            self.redraw();
        }
    }

    /// Clears the error state, announcing it with a status update.
    pub fn clear_error(&mut self) {
        if !self.has(Status::Error) {
            return;
        }
        self.error = None;
        self.auto_validate = AutoValidate::Blur;
        self.apply_status(Status::Error, false, true);
    }

    /// Error removal on `set`: same state change as [`Field::clear_error`]
    /// without the status update.
    pub(super) fn dismiss_error(&mut self) {
        self.error = None;
        self.auto_validate = AutoValidate::Blur;
        self.apply_status(Status::Error, false, false);
    }
}
