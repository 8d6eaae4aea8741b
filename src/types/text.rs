use std::any::Any;

use super::FieldType;

/// Plain text: no conversion, no validation beyond `required`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextType;

impl FieldType for TextType {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
