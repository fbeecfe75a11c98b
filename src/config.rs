//! # Options
//!
//! Parse and serialize behavior. Every key is optional, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! max_depth = 8
//! details_title = "More"
//! normalize_math = false
//! ```
use crate::markdown::DEFAULT_DETAILS_TITLE;
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors when loading options
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Could not read options file: {0}
    Io(#[from] std::io::Error),
    /// Invalid options: {0}
    Toml(#[from] toml::de::Error),
}

/// Options for [`from_markdown_with`](crate::markdown::from_markdown_with) and
/// [`to_markdown_with`](crate::markdown::to_markdown_with)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Options {
    /// How deep containers and inline marks may nest before they are kept as text
    pub max_depth: usize,
    /// The title of a collapsible section that has no summary
    pub details_title: String,
    /// Whether to collapse `\\cmd` to `\cmd` inside math spans when serializing
    pub normalize_math: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: 32,
            details_title: DEFAULT_DETAILS_TITLE.to_string(),
            normalize_math: true,
        }
    }
}

impl Options {
    /// Parse options from TOML text.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Options};
    use std::path::Path;

    #[test]
    fn defaults() {
        let options = Options::from_toml_str("").unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(options.max_depth, 32);
        assert_eq!(options.details_title, "Details");
        assert!(options.normalize_math);
    }

    #[test]
    fn partial() {
        let options = Options::from_toml_str("max_depth = 4\nunknown = 1").unwrap();
        assert_eq!(
            options,
            Options {
                max_depth: 4,
                ..Options::default()
            }
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(
            Options::from_toml_str("max_depth = \"deep\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Options::load(Path::new("/nonexistent/notemark.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
