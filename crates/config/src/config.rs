use std::fmt;
use std::path;

use relative_path::RelativePath;
use relative_path::RelativePathBuf;
use serde_yaml::Mapping;
use serde_yaml::Value;

use super::*;

/// Name of the configuration file at the root of a site.
pub const CONFIG_FILE_NAME: &str = "_config.yml";

const REQUIRED_FIELDS: &[&str] = &["title", "url"];

static ABSOLUTE_URL: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^/\s]+(/\S*)?$").unwrap()
});

/// The site-wide configuration record, read once per build and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(not(feature = "unstable"), non_exhaustive)]
pub struct Config {
    /// Directory the configuration was loaded from; the source root of the site.
    #[serde(skip)]
    pub root: path::PathBuf,
    pub title: KString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<KString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<KString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<KString>,
    pub url: KString,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub baseurl: KString,
    pub permalink: Permalink,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<KString>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<RelativePathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<KString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<KString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_theme: Option<RemoteTheme>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_drafts: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defaults: Vec<DefaultRule>,
    /// Site variables this crate does not interpret, such as `author` or `locale`.
    #[serde(flatten)]
    pub data: Mapping,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            root: Default::default(),
            title: Default::default(),
            owner: Default::default(),
            email: Default::default(),
            description: Default::default(),
            url: Default::default(),
            baseurl: Default::default(),
            permalink: Default::default(),
            plugins: Default::default(),
            include: Default::default(),
            exclude: Default::default(),
            theme: Default::default(),
            remote_theme: Default::default(),
            show_drafts: false,
            defaults: Default::default(),
            data: Default::default(),
        }
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Config> {
        let value: Value = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(content)?
        };

        let mapping = match value {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            _ => {
                return Err(ConfigError::schema(
                    "the top level must be a mapping of keys to values",
                ));
            }
        };

        for field in REQUIRED_FIELDS {
            if mapping.get(*field).is_none_or(Value::is_null) {
                return Err(ConfigError::field(field, "is required"));
            }
        }

        let config: Config = serde_yaml::from_value(Value::Mapping(mapping))
            .map_err(|e| ConfigError::schema(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }
}

impl Config {
    /// Load from raw bytes; text that is not UTF-8 fails like any other malformed YAML.
    pub fn from_slice(content: &[u8]) -> Result<Config> {
        let content = std::str::from_utf8(content)
            .map_err(|e| ConfigError::Parse(serde::de::Error::custom(e)))?;
        content.parse()
    }

    pub fn from_file<P: Into<path::PathBuf>>(path: P) -> Result<Config> {
        Self::from_file_internal(path.into())
    }

    fn from_file_internal(path: path::PathBuf) -> Result<Config> {
        let content = std::fs::read(&path).map_err(|error| ConfigError::Io {
            path: path.clone(),
            error,
        })?;

        let mut config = Self::from_slice(&content)?;

        let mut root = path;
        root.pop(); // Remove filename
        if root == path::Path::new("") {
            root = path::Path::new(".").to_owned();
        }
        config.root = root;
        config.check_includes()?;

        Ok(config)
    }

    pub fn from_cwd<P: Into<path::PathBuf>>(cwd: P) -> Result<Config> {
        Self::from_cwd_internal(cwd.into())
    }

    fn from_cwd_internal(cwd: path::PathBuf) -> Result<Config> {
        let file_path = find_project_file(&cwd, CONFIG_FILE_NAME).ok_or(ConfigError::NotFound {
            dir: cwd,
            name: CONFIG_FILE_NAME,
        })?;
        log::debug!("Using config file `{}`", file_path.display());
        Self::from_file(file_path)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::field("title", "must not be empty"));
        }
        if !ABSOLUTE_URL.is_match(&self.url) {
            return Err(ConfigError::field(
                "url",
                format!("must be an absolute URL like `https://example.com`, got `{}`", self.url),
            ));
        }
        if !self.baseurl.is_empty() && !self.baseurl.starts_with('/') {
            return Err(ConfigError::field(
                "baseurl",
                format!("must start with `/`, got `{}`", self.baseurl),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for plugin in &self.plugins {
            if plugin.trim().is_empty() {
                return Err(ConfigError::field("plugins", "must not contain empty names"));
            }
            if !seen.insert(plugin.as_str()) {
                log::warn!("Plugin `{plugin}` is listed more than once");
            }
        }

        for include in &self.include {
            let escapes_root = include
                .components()
                .any(|c| c == relative_path::Component::ParentDir);
            if include.as_str().starts_with('/') || include.as_str().is_empty() || escapes_root {
                return Err(ConfigError::field(
                    "include",
                    format!("entries must be paths inside the source root, got `{include}`"),
                ));
            }
        }

        for rule in &self.defaults {
            rule.scope.validate()?;
        }

        if let (Some(theme), Some(remote_theme)) = (&self.theme, &self.remote_theme) {
            log::warn!("Both `theme: {theme}` and `remote_theme: {remote_theme}` are set, `remote_theme` takes precedence");
        }

        Ok(())
    }

    /// Every `include` entry must exist under [`Config::root`].
    pub fn check_includes(&self) -> Result<()> {
        for include in &self.include {
            let path = include.to_path(&self.root);
            if !path.exists() {
                return Err(ConfigError::field(
                    "include",
                    format!("entry `{include}` does not exist under `{}`", self.root.display()),
                ));
            }
        }
        Ok(())
    }

    /// Report the first plugin that is not among the `available` extensions.
    pub fn check_plugins<'a>(&self, available: impl IntoIterator<Item = &'a str>) -> Result<()> {
        let available: std::collections::HashSet<&str> = available.into_iter().collect();
        match self
            .plugins
            .iter()
            .find(|plugin| !available.contains(plugin.as_str()))
        {
            Some(missing) => Err(ConfigError::field(
                "plugins",
                format!("names `{missing}` which is not installed"),
            )),
            None => Ok(()),
        }
    }

    /// Plugins in the order the rendering pipeline applies them.
    pub fn resolve_plugins(&self) -> &[KString] {
        &self.plugins
    }

    /// Default front matter for a document, from every `defaults` rule that matches it.
    pub fn resolve_defaults(&self, path: &RelativePath, content_type: &ContentType) -> Frontmatter {
        resolve_defaults(&self.defaults, path, content_type)
    }

    /// The remote theme when set, otherwise the local one.
    pub fn effective_theme(&self) -> Option<String> {
        self.remote_theme
            .as_ref()
            .map(|theme| theme.to_string())
            .or_else(|| self.theme.as_ref().map(|theme| theme.to_string()))
    }

    /// `url` joined with `baseurl`, without a trailing slash.
    pub fn site_url(&self) -> String {
        format!(
            "{}{}",
            self.url.trim_end_matches('/'),
            self.baseurl.trim_end_matches('/')
        )
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.site_url(), path.trim_start_matches('/'))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        let converted = converted.strip_prefix("---\n").unwrap_or(&converted);
        write!(f, "{}", converted.trim_end())
    }
}

fn find_project_file<P: Into<path::PathBuf>>(dir: P, name: &str) -> Option<path::PathBuf> {
    find_project_file_internal(dir.into(), name)
}

fn find_project_file_internal(dir: path::PathBuf, name: &str) -> Option<path::PathBuf> {
    let mut file_path = dir;
    file_path.push(name);
    while !file_path.exists() {
        file_path.pop(); // filename
        let hit_bottom = !file_path.pop();
        if hit_bottom {
            return None;
        }
        file_path.push(name);
    }
    Some(file_path)
}
