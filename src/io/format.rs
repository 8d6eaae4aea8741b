use std::{fmt, path::Path};

/// Document formats field options can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    /// Formats compiled into this build.
    pub fn available_formats() -> &'static [DocumentFormat] {
        &[
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }

    /// Guesses the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_always_available() {
        assert!(DocumentFormat::available_formats().contains(&DocumentFormat::Json));
        assert_eq!(DocumentFormat::default(), DocumentFormat::Json);
    }

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(DocumentFormat::from_extension("JSON"), Some(DocumentFormat::Json));
        assert_eq!(
            DocumentFormat::from_path(Path::new("fields/dob.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_extension("ini"), None);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), None);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_has_two_extensions() {
        assert_eq!(DocumentFormat::from_extension("yml"), Some(DocumentFormat::Yaml));
        assert_eq!(DocumentFormat::from_extension("yaml"), Some(DocumentFormat::Yaml));
    }
}
