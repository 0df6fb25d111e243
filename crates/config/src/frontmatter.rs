use std::fmt;

use serde_yaml::Mapping;
use serde_yaml::Value;

/// Ordered key/value metadata attached to a document, either written in the document itself
/// or resolved from the site's `defaults`.
#[derive(Debug, PartialEq, Default, Clone, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(Mapping);

impl Frontmatter {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string value, ignoring values of other types.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(Value::from(key), value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    /// Write every key of `other` over `self`.
    ///
    /// Keys already present keep their position; new keys are appended.
    pub fn overlay(mut self, other: &Self) -> Self {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    /// Fill the keys `self` lacks from `other`; on collision `self` wins.
    pub fn merge(self, other: &Self) -> Self {
        other.clone().overlay(&self)
    }

    pub fn into_inner(self) -> Mapping {
        self.0
    }
}

impl From<Mapping> for Frontmatter {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

impl fmt::Display for Frontmatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        let subset = converted
            .strip_prefix("---")
            .unwrap_or(converted.as_str())
            .trim();
        write!(f, "{subset}")
    }
}

/// Merge the values resolved from the site's `defaults` underneath a document's own front
/// matter.  Keys written in the document always win.
pub fn resolve_front_matter(document: &Frontmatter, defaults: &Frontmatter) -> Frontmatter {
    document.clone().merge(defaults)
}
