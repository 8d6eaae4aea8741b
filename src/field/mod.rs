//! One bound control plus its lifecycle: typed conversion, dirty tracking,
//! validation state, status flags and decorations.
//!
//! A field never runs anything behind the caller's back. Work that has to
//! wait (validation after blur/keyup, the clean check, flashing) is queued
//! on the field's own timers and runs when the embedder calls
//! [`Field::advance`] or [`Field::run_pending`].

mod builder;
mod input;
mod status;
mod validation;
mod value_ops;

use std::time::Duration;

use indexmap::IndexMap;

use crate::collab::{Calendar, KeyFilter};
use crate::control::Control;
use crate::decoration::Decorations;
use crate::error::FieldError;
use crate::options::{FieldConfig, FieldOptions};
use crate::schedule::{TimerHandle, Timers};
use crate::types::{FieldType, TypeRegistry};

pub use builder::FieldBuilder;

/// Builds a [`crate::types::TypeHost`] from disjoint borrows of a field so the active type
/// can be called while the host is alive.
macro_rules! type_host {
    ($field:expr) => {
        $crate::types::TypeHost::new(
            &$field.options,
            &$field.config,
            &mut $field.decorations,
            &mut $field.calendar,
            &mut $field.filter,
        )
    };
}
pub(crate) use type_host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Require,
    Disabled,
    Error,
    Hover,
    Warn,
    Focus,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Require,
        Status::Disabled,
        Status::Error,
        Status::Hover,
        Status::Warn,
        Status::Focus,
    ];

    /// Recognized status names; `disable` is accepted for `disabled`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "require" => Some(Status::Require),
            "disabled" | "disable" => Some(Status::Disabled),
            "error" => Some(Status::Error),
            "hover" => Some(Status::Hover),
            "warn" => Some(Status::Warn),
            "focus" => Some(Status::Focus),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Require => "require",
            Status::Disabled => "disabled",
            Status::Error => "error",
            Status::Hover => "hover",
            Status::Warn => "warn",
            Status::Focus => "focus",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When edits trigger validation on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoValidate {
    #[default]
    Blur,
    Keyup,
}

/// Notifications a field emits, drained with [`Field::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    Dirty,
    Clean,
    AfterSet {
        display: Option<String>,
        value: Option<String>,
    },
    StatusUpdate {
        status: Status,
        value: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOptions {
    /// Make the value the new clean baseline.
    pub auto_clean: bool,
}

impl Default for SetOptions {
    fn default() -> Self {
        Self { auto_clean: true }
    }
}

/// An unsaved edit clashing with a value pushed from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub key: Option<String>,
    pub current: String,
    pub incoming: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldTask {
    Validate,
    CleanCheck,
    Flash { remaining: u32, lit: bool },
}

#[derive(Debug)]
pub struct Field {
    control: Box<dyn Control>,
    options: FieldOptions,
    config: FieldConfig,
    registry: std::sync::Arc<TypeRegistry>,
    type_name: String,
    active_type: Box<dyn FieldType>,
    decorations: Decorations,
    calendar: Box<dyn Calendar>,
    filter: Option<KeyFilter>,
    prev_value: Option<String>,
    dirty: bool,
    states: IndexMap<Status, bool>,
    auto_validate: AutoValidate,
    error: Option<FieldError>,
    hidden: bool,
    flashing: bool,
    timers: Timers<FieldTask>,
    pending_validation: Option<TimerHandle>,
    clean_check: Option<TimerHandle>,
    flash_timer: Option<TimerHandle>,
    events: Vec<FieldEvent>,
}

impl Field {
    pub fn control(&self) -> &dyn Control {
        self.control.as_ref()
    }

    /// Direct access to the control, for embedders feeding raw edits.
    /// Follow up with [`Field::on_keyup`] or [`Field::on_change`].
    pub fn control_mut(&mut self) -> &mut dyn Control {
        self.control.as_mut()
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn calendar(&self) -> &dyn Calendar {
        self.calendar.as_ref()
    }

    pub fn key_filter(&self) -> Option<&KeyFilter> {
        self.filter.as_ref()
    }

    pub fn get_type(&self) -> &dyn FieldType {
        self.active_type.as_ref()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn auto_validate(&self) -> AutoValidate {
        self.auto_validate
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub fn prev_value(&self) -> Option<&str> {
        self.prev_value.as_deref()
    }

    pub fn drain_events(&mut self) -> Vec<FieldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Swaps the active type: the current instance is torn down before the
    /// new one is set up, then the `max` option is applied again. An unknown
    /// name leaves the current type in place.
    pub fn set_type(&mut self, name: Option<&str>) -> Result<(), crate::ConfigError> {
        let (type_name, next) = self.registry.resolve(name)?;
        self.active_type.tear_down(&mut type_host!(self));
        tracing::debug!(from = %self.type_name, to = %type_name, "swapping field type");
        self.active_type = next;
        self.type_name = type_name;
        self.active_type.set_up(&mut type_host!(self));
        if let Some(max) = self.options.max {
            self.set_max(max);
        }
        Ok(())
    }

    pub fn set_label(&mut self, label: &str) {
        self.decorations.set_label(label);
    }

    pub fn set_placeholder(&mut self, text: &str) {
        self.decorations.set_placeholder(text);
    }

    /// Legacy name of [`Field::set_placeholder`].
    pub fn placeholder(&mut self, text: &str) {
        self.set_placeholder(text);
    }

    pub fn set_prefix(&mut self, text: &str) {
        self.decorations.set_prefix(text);
        self.redraw();
    }

    pub fn set_suffix(&mut self, text: &str) {
        self.decorations.set_suffix(text);
        self.redraw();
    }

    pub fn set_notice(&mut self, text: &str) {
        self.decorations.set_notice(text);
        self.redraw();
    }

    /// Caps how many characters may be typed.
    pub fn set_max(&mut self, max: usize) {
        match &mut self.filter {
            Some(filter) => filter.set_max(max),
            None => self.filter = Some(KeyFilter::any().with_max_length(max)),
        }
    }

    pub fn add_on(
        &mut self,
        weight: i32,
        content: &str,
        class: Option<&str>,
    ) -> crate::DecorationId {
        self.decorations.add_on(weight, content, class)
    }

    pub fn add_in(
        &mut self,
        content: &str,
        weight: i32,
        class: Option<&str>,
        fixed: bool,
    ) -> crate::DecorationId {
        self.decorations.add_in(content, weight, class, fixed)
    }

    pub fn toggle_add_in(
        &mut self,
        selector: impl Into<crate::AddInSelector>,
        visible: Option<bool>,
    ) -> Option<crate::DecorationId> {
        self.decorations.toggle_add_in(selector, visible)
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Tears down the active type and drops pending work and decorations,
    /// handing the control back.
    pub fn destroy(mut self) -> Box<dyn Control> {
        self.active_type.tear_down(&mut type_host!(self));
        self.timers.clear();
        self.control
    }
}
