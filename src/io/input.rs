use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;

use super::DocumentFormat;
use crate::options::{FieldOptions, Strings};

/// Parse a field options document.
pub fn parse_field_options(contents: &str, format: DocumentFormat) -> Result<FieldOptions> {
    parse_document_str(contents, format)
}

/// Parse a string table document.
pub fn parse_strings(contents: &str, format: DocumentFormat) -> Result<Strings> {
    parse_document_str(contents, format)
}

/// Read field options from a file, picking the format from its extension.
pub fn load_field_options(path: &Path) -> Result<FieldOptions> {
    load_document(path)
}

pub fn load_strings(path: &Path) -> Result<Strings> {
    load_document(path)
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "cannot tell the format of {} (supported: {})",
            path.display(),
            supported_list()
        )
    })?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document_str(&contents, format).with_context(|| format!("in {}", path.display()))
}

fn parse_document_str<T: DeserializeOwned>(contents: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<T>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<T>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            toml::from_str::<T>(contents).with_context(|| "failed to parse TOML document")
        }
    }
}

fn supported_list() -> String {
    DocumentFormat::available_formats()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
