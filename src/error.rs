use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::ControlKind;

/// Fatal problems raised while a field is being bound or re-typed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid control: {0} controls cannot be bound to a field")]
    InvalidControl(ControlKind),
    #[error("invalid type \"{0}\"")]
    UnknownType(String),
}

/// A recoverable validation failure stored on a field.
///
/// `message` is the only part guaranteed to be present and is what the user
/// sees; `code` and `description` are carried for embedders that want them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            description: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
