use std::time::Duration;

use crossterm::event::KeyEvent;
use tracing::{debug, trace};

use crate::control::KeyEdit;
use crate::decoration::LayerKind;
use crate::schedule::TimerHandle;

use super::{AutoValidate, Field, FieldTask, Status};

impl Field {
    pub fn on_focus(&mut self) {
        self.apply_status(Status::Focus, true, true);
    }

    pub fn on_blur(&mut self) {
        self.apply_status(Status::Focus, false, true);
        if self.auto_validate == AutoValidate::Blur {
            self.schedule_validation();
        }
    }

    pub fn on_change(&mut self) {
        self.on_keyup();
    }

    pub fn on_keydown(&mut self) {
        self.decorations
            .set_layer_visible(LayerKind::Placeholder, false);
    }

    pub fn on_keyup(&mut self) {
        if self.auto_validate == AutoValidate::Keyup {
            self.schedule_validation();
        }
        self.check_dirty();
        self.redraw();
    }

    pub fn on_mouse_enter(&mut self) {
        self.apply_status(Status::Hover, true, true);
    }

    pub fn on_mouse_leave(&mut self) {
        self.apply_status(Status::Hover, false, true);
    }

    /// Flips the tooltip popover; returns whether it is now open.
    pub fn on_tooltip_click(&mut self) -> bool {
        self.decorations.toggle_tooltip()
    }

    /// Feeds one key press through keydown, the key filter, the control
    /// buffer and keyup. Returns whether the text changed. Keys the filter
    /// rejects flash the field; disabled fields ignore input.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.on_keydown();
        let edit = match KeyEdit::from_key(key) {
            Some(KeyEdit::Insert(ch)) => {
                let accepted = match &self.filter {
                    Some(filter) => filter.accept(self.control.text(), ch),
                    None => Some(ch),
                };
                if accepted.is_none() {
                    trace!(?ch, "key rejected by filter");
                    self.flash(1);
                }
                accepted.map(KeyEdit::Insert)
            }
            other => other,
        };
        let changed = match edit {
            Some(edit) => {
                let mut text = self.control.text().to_string();
                edit.apply(&mut text);
                let changed = text != self.control.text();
                self.control.set_text(&text);
                changed
            }
            None => false,
        };
        self.on_keyup();
        changed
    }

    /// Blinks the field `times` times (at least once): lit for one interval,
    /// dark for one, step after step. Replaces a running sequence.
    pub fn flash(&mut self, times: u32) {
        let times = times.max(1);
        self.flashing = true;
        self.timers.replace(
            &mut self.flash_timer,
            self.config.flash_interval,
            FieldTask::Flash {
                remaining: times,
                lit: true,
            },
        );
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    /// Moves the field's clock forward, running every task that falls due on
    /// the way in order.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timers.now() + elapsed;
        while let Some((handle, task)) = self.timers.pop_due(until) {
            self.run_task(handle, task);
        }
        self.timers.advance_to(until);
    }

    /// Runs whatever is already due, including zero-delay work.
    pub fn run_pending(&mut self) {
        self.advance(Duration::ZERO);
    }

    fn schedule_validation(&mut self) {
        self.timers.replace(
            &mut self.pending_validation,
            self.config.validate_delay,
            FieldTask::Validate,
        );
    }

    fn run_task(&mut self, handle: TimerHandle, task: FieldTask) {
        debug!(?task, at = ?self.timers.now(), "running field task");
        match task {
            FieldTask::Validate => {
                release(&mut self.pending_validation, handle);
                self.validate(true);
            }
            FieldTask::CleanCheck => {
                release(&mut self.clean_check, handle);
                self.run_clean_check();
            }
            FieldTask::Flash { remaining, lit } => {
                release(&mut self.flash_timer, handle);
                let interval = self.config.flash_interval;
                if lit {
                    self.flashing = false;
                    if remaining > 1 {
                        self.timers.replace(
                            &mut self.flash_timer,
                            interval,
                            FieldTask::Flash {
                                remaining: remaining - 1,
                                lit: false,
                            },
                        );
                    }
                } else {
                    self.flashing = true;
                    self.timers.replace(
                        &mut self.flash_timer,
                        interval,
                        FieldTask::Flash {
                            remaining,
                            lit: true,
                        },
                    );
                }
            }
        }
    }
}

fn release(slot: &mut Option<TimerHandle>, handle: TimerHandle) {
    if *slot == Some(handle) {
        *slot = None;
    }
}
