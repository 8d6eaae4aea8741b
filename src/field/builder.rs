use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::collab::{Calendar, CalendarSlot};
use crate::control::Control;
use crate::decoration::Decorations;
use crate::error::ConfigError;
use crate::options::{FieldConfig, FieldOptions};
use crate::schedule::Timers;
use crate::types::TypeRegistry;

use super::{AutoValidate, Field, Status, type_host};

/// Collects what a field needs before binding it to a control.
#[derive(Debug)]
pub struct FieldBuilder {
    control: Box<dyn Control>,
    options: FieldOptions,
    registry: Arc<TypeRegistry>,
    config: FieldConfig,
    calendar: Box<dyn Calendar>,
}

impl FieldBuilder {
    pub fn new(control: impl Control + 'static) -> Self {
        Self::from_boxed(Box::new(control))
    }

    pub fn from_boxed(control: Box<dyn Control>) -> Self {
        Self {
            control,
            options: FieldOptions::default(),
            registry: Arc::new(TypeRegistry::default()),
            config: FieldConfig::default(),
            calendar: Box::new(CalendarSlot::default()),
        }
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_calendar(mut self, calendar: impl Calendar + 'static) -> Self {
        self.calendar = Box::new(calendar);
        self
    }

    /// Binds the control. Fails for submit controls and unknown type names.
    pub fn bind(self) -> Result<Field, ConfigError> {
        let FieldBuilder {
            control,
            options,
            registry,
            config,
            calendar,
        } = self;

        let kind = control.kind();
        if !kind.is_bindable() {
            return Err(ConfigError::InvalidControl(kind));
        }
        let (type_name, active_type) = registry.resolve(options.type_name.as_deref())?;

        let mut decorations = Decorations::new(options.width.unwrap_or(config.default_width));
        if let Some(label) = &options.label {
            decorations.set_label(label.as_str());
        }
        if let Some(text) = options.placeholder_text() {
            decorations.set_placeholder(text);
        }
        if let Some(text) = &options.preinput {
            decorations.add_on(-1, text.as_str(), Some("preinput"));
        }
        if let Some(text) = &options.postinput {
            decorations.add_on(1, text.as_str(), Some("postinput"));
        }
        if let Some(text) = &options.suffix {
            decorations.set_suffix(text);
        }
        if let Some(text) = &options.prefix {
            decorations.set_prefix(text);
        }
        if let Some(text) = &options.tooltip {
            decorations.set_tooltip(text);
        }
        if let Some(text) = &options.notice {
            decorations.set_notice(text);
        }

        let prev_value = Some(control.text().to_string());
        let states = Status::ALL
            .into_iter()
            .map(|status| (status, false))
            .collect::<IndexMap<_, _>>();

        let mut field = Field {
            control,
            options,
            config,
            registry,
            type_name,
            active_type,
            decorations,
            calendar,
            filter: None,
            prev_value,
            dirty: false,
            states,
            auto_validate: AutoValidate::Blur,
            error: None,
            hidden: false,
            flashing: false,
            timers: Timers::new(),
            pending_validation: None,
            clean_check: None,
            flash_timer: None,
            events: Vec::new(),
        };

        if field.options.is_required() {
            field.apply_status(Status::Require, true, false);
        }
        field.active_type.set_up(&mut type_host!(field));
        if let Some(max) = field.options.max {
            field.set_max(max);
        }
        debug!(r#type = %field.type_name, kind = %kind, "bound field");

        field.init();
        Ok(field)
    }
}

impl Field {
    pub fn builder(control: impl Control + 'static) -> FieldBuilder {
        FieldBuilder::new(control)
    }

    /// Binds `control` with the default registry and configuration.
    pub fn bind(control: impl Control + 'static, options: FieldOptions) -> Result<Self, ConfigError> {
        FieldBuilder::new(control).with_options(options).bind()
    }

    /// Loads the control's own value attribute as the clean baseline.
    fn init(&mut self) {
        let initial = self.control.value_attribute().map(str::to_string);
        self.set(initial.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlKind, TextControl};
    use crate::decoration::RowItem;

    #[test]
    fn rejects_submit_controls() {
        let err = Field::bind(
            TextControl::new().with_kind(ControlKind::Submit),
            FieldOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidControl(ControlKind::Submit)));

        for kind in [ControlKind::Input, ControlKind::Select, ControlKind::Textarea] {
            assert!(Field::bind(TextControl::new().with_kind(kind), FieldOptions::default()).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_types() {
        let err = Field::bind(TextControl::new(), FieldOptions::new().with_type("color"))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid type \"color\"");
    }

    #[test]
    fn decorations_follow_the_options() {
        let options = FieldOptions {
            preinput: Some("$".into()),
            postinput: Some("USD".into()),
            tooltip: Some("Amount to transfer".into()),
            ..FieldOptions::new().with_label("Amount").with_suffix(".00")
        };
        let field = Field::bind(TextControl::new(), options).unwrap();
        let decorations = field.decorations();

        assert_eq!(decorations.label(), Some("Amount"));
        assert!(decorations.suffix().is_some());
        assert_eq!(decorations.tooltip_text(), Some("Amount to transfer"));
        let contents = decorations
            .row()
            .iter()
            .map(|item| match item {
                RowItem::Input => "input".to_string(),
                RowItem::AddOn(id) => decorations.get(*id).unwrap().content().to_string(),
            })
            .collect::<Vec<_>>();
        assert_eq!(contents, ["$", "input", "USD", "?"]);
    }

    #[test]
    fn required_option_sets_status_silently() {
        let mut field =
            Field::bind(TextControl::new(), FieldOptions::new().with_required(true)).unwrap();
        assert!(field.has(Status::Require));
        assert!(
            !field
                .drain_events()
                .iter()
                .any(|event| matches!(event, super::super::FieldEvent::StatusUpdate { .. }))
        );
    }

    #[test]
    fn value_attribute_becomes_the_baseline() {
        let field = Field::bind(
            TextControl::new().with_value_attribute("hello"),
            FieldOptions::default(),
        )
        .unwrap();
        assert_eq!(field.get(), "hello");
        assert_eq!(field.prev_value(), Some("hello"));
        assert!(!field.is_dirty());
    }
}
