use std::path::PathBuf;

use crate::KString;

/// Errors raised while loading a site configuration or a document's front matter.
///
/// Every variant is fatal: a build never continues with a partially valid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The text is not well-formed YAML.
    #[error("malformed YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The YAML is well-formed but does not describe a valid configuration.
    #[error("{}", schema_message(.field.as_deref(), .message))]
    Schema {
        /// Top-level key the error is about, when there is one.
        field: Option<KString>,
        message: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read `{}`: {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// No configuration file was found in a directory or any of its ancestors.
    #[error("no `{name}` found in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf, name: &'static str },
}

impl ConfigError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            field: None,
            message: message.into(),
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            field: Some(KString::from_ref(field)),
            message: message.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// The offending top-level key of a schema error.
    pub fn schema_field(&self) -> Option<&str> {
        match self {
            Self::Schema { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

fn schema_message(field: Option<&str>, message: &str) -> String {
    match field {
        Some(field) => format!("invalid configuration: `{field}` {message}"),
        None => format!("invalid configuration: {message}"),
    }
}
