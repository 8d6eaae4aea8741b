//! Field types: per-field behaviour plugged into a field by name.
//!
//! A [`TypeRegistry`] maps names to descriptors. Binding a type asks the
//! descriptor for a fresh instance, so settings a type resolves during
//! [`FieldType::set_up`] belong to that one field.

pub mod date;
mod text;

use std::{any::Any, sync::Arc};

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::collab::{Calendar, CalendarOptions, KeyFilter};
use crate::decoration::Decorations;
use crate::error::{ConfigError, FieldError};
use crate::options::{FieldConfig, FieldOptions, Strings};

pub use date::DateType;
pub use text::TextType;

/// Name used when a field asks for no particular type.
pub const DEFAULT_TYPE: &str = "text";

/// Behaviour bound to one field. Every hook is optional; the defaults
/// describe a type that declares none of them.
pub trait FieldType: std::fmt::Debug {
    fn set_up(&mut self, host: &mut TypeHost<'_>) {
        let _ = host;
    }

    fn tear_down(&mut self, host: &mut TypeHost<'_>) {
        let _ = host;
    }

    /// Converter between the stored value and the text shown in the
    /// control. `None` passes values through untouched.
    fn converter(&self) -> Option<&dyn Converter> {
        None
    }

    /// Type validation of non-empty raw control text. `None` means the type
    /// declares no validator.
    fn validate(&self, raw: &str, strings: &Strings) -> Option<Result<(), FieldError>> {
        let _ = (raw, strings);
        None
    }

    /// `None` falls back to "trimmed text is empty".
    fn is_empty(&self, raw: &str) -> Option<bool> {
        let _ = raw;
        None
    }

    /// Value the field resets to on `clear`. `None` keeps the plain reset
    /// to an empty baseline.
    fn clear(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

pub trait Converter {
    /// Stored representation to control text.
    fn to_field(&self, value: &str) -> String;
    /// Control text to stored representation.
    fn from_field(&self, raw: &str) -> String;
}

/// Immutable recipe for a field type.
pub trait TypeDescriptor: Send + Sync {
    fn instantiate(&self) -> Box<dyn FieldType>;
}

impl<F> TypeDescriptor for F
where
    F: Fn() -> Box<dyn FieldType> + Send + Sync,
{
    fn instantiate(&self) -> Box<dyn FieldType> {
        self()
    }
}

#[derive(Clone)]
pub struct TypeRegistry {
    entries: IndexMap<String, Arc<dyn TypeDescriptor>>,
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_default::<DateType>("date");
        registry
    }
}

impl TypeRegistry {
    /// A registry holding only the `text` type.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: IndexMap::new(),
        };
        registry.register_default::<TextType>(DEFAULT_TYPE);
        registry
    }

    /// Registers (or replaces) a type under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: impl TypeDescriptor + 'static,
    ) -> &mut Self {
        self.entries.insert(name.into(), Arc::new(descriptor));
        self
    }

    pub fn register_default<T>(&mut self, name: impl Into<String>) -> &mut Self
    where
        T: FieldType + Default + 'static,
    {
        self.register(name, || Box::new(T::default()) as Box<dyn FieldType>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolves a type name, falling back to `text` when none is given.
    pub fn resolve(&self, name: Option<&str>) -> Result<(String, Box<dyn FieldType>), ConfigError> {
        let name = name.map(str::trim).filter(|name| !name.is_empty());
        let key = name.unwrap_or(DEFAULT_TYPE);
        match self.entries.get(key) {
            Some(descriptor) => Ok((key.to_string(), descriptor.instantiate())),
            None => Err(ConfigError::UnknownType(key.to_string())),
        }
    }
}

/// The parts of a field a type may touch while setting up or tearing down.
pub struct TypeHost<'a> {
    options: &'a FieldOptions,
    config: &'a FieldConfig,
    decorations: &'a mut Decorations,
    calendar: &'a mut Box<dyn Calendar>,
    filter: &'a mut Option<KeyFilter>,
}

impl<'a> TypeHost<'a> {
    pub(crate) fn new(
        options: &'a FieldOptions,
        config: &'a FieldConfig,
        decorations: &'a mut Decorations,
        calendar: &'a mut Box<dyn Calendar>,
        filter: &'a mut Option<KeyFilter>,
    ) -> Self {
        Self {
            options,
            config,
            decorations,
            calendar,
            filter,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.options.attribute(key)
    }

    pub fn toggle_attribute(&self, key: &str) -> bool {
        self.options.toggle_attribute(key)
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }

    pub fn strings(&self) -> &Strings {
        self.config.strings()
    }

    pub fn set_placeholder(&mut self, text: &str) {
        self.decorations.set_placeholder(text);
    }

    /// Puts back the placeholder the field was configured with, or removes
    /// it when there was none.
    pub fn restore_placeholder(&mut self) {
        match self.options.placeholder_text() {
            Some(text) => self.decorations.set_placeholder(text),
            None => self.decorations.clear_placeholder(),
        }
    }

    pub fn attach_calendar(&mut self, options: CalendarOptions) {
        self.calendar.attach(options);
    }

    pub fn detach_calendar(&mut self) {
        self.calendar.detach();
    }

    pub fn set_key_filter(&mut self, filter: KeyFilter) {
        *self.filter = Some(filter);
    }

    pub fn clear_key_filter(&mut self) {
        *self.filter = None;
    }
}
