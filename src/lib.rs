#![deny(rust_2018_idioms)]

pub mod collab;
pub mod control;
pub mod decoration;
mod error;
pub mod field;
pub mod io;
pub mod options;
pub mod schedule;
pub mod types;

pub use collab::{Calendar, CalendarOptions, CalendarSlot, KeyFilter};
pub use control::{Control, ControlKind, TextControl};
pub use decoration::{AddInSelector, DecorationId, Decorations, LayerKind, RowItem, Side};
pub use error::{ConfigError, FieldError};
pub use field::{
    AutoValidate, Conflict, Field, FieldBuilder, FieldEvent, SetOptions, Status,
};
pub use io::DocumentFormat;
pub use options::{Clock, FieldConfig, FieldOptions, FixedClock, Strings, SystemClock};
pub use types::{
    Converter, DateType, FieldType, TextType, TypeDescriptor, TypeHost, TypeRegistry,
};

pub mod prelude {
    pub use super::{
        Control, Field, FieldConfig, FieldEvent, FieldOptions, Status, TextControl, TypeRegistry,
    };
}
