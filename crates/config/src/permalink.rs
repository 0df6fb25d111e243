use std::fmt;

use crate::KString;

/// The URL-shape strategy for generated pages.
///
/// Either one of the built-in styles or an explicit `:variable` template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permalink {
    Alias(PermalinkAlias),
    Explicit(ExplicitPermalink),
}

impl Permalink {
    /// The `:variable` template used to build URLs for posts.
    pub fn template(&self) -> &str {
        match self {
            Permalink::Alias(alias) => alias.template(),
            Permalink::Explicit(path) => path.as_str(),
        }
    }

    /// Whether URLs end with a directory rather than a file extension.
    pub fn is_pretty(&self) -> bool {
        match self {
            Permalink::Alias(alias) => *alias == PermalinkAlias::Pretty,
            Permalink::Explicit(path) => path.ends_with('/'),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Permalink::Alias(alias) => alias.as_str(),
            Permalink::Explicit(path) => path.as_str(),
        }
    }
}

impl Default for Permalink {
    fn default() -> Self {
        Permalink::Alias(PermalinkAlias::Date)
    }
}

impl fmt::Display for Permalink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Permalink {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if let Some(alias) = PermalinkAlias::from_name(value) {
            return Ok(Permalink::Alias(alias));
        }
        ExplicitPermalink::try_from(value)
            .map(Permalink::Explicit)
            .map_err(|_| {
                format!(
                    "unrecognized permalink style `{value}`, expected one of {} or a template starting with `/`",
                    PermalinkAlias::NAMES.join(", ")
                )
            })
    }
}

impl TryFrom<String> for Permalink {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Permalink> for String {
    fn from(permalink: Permalink) -> Self {
        permalink.as_str().to_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermalinkAlias {
    Date,
    Pretty,
    Ordinal,
    Weekdate,
    None,
}

impl PermalinkAlias {
    pub const NAMES: &'static [&'static str] = &["date", "pretty", "ordinal", "weekdate", "none"];

    pub fn from_name(name: &str) -> Option<Self> {
        let alias = match name {
            "date" => Self::Date,
            "pretty" => Self::Pretty,
            "ordinal" => Self::Ordinal,
            "weekdate" => Self::Weekdate,
            "none" => Self::None,
            _ => return None,
        };
        Some(alias)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Pretty => "pretty",
            Self::Ordinal => "ordinal",
            Self::Weekdate => "weekdate",
            Self::None => "none",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::Date => "/:categories/:year/:month/:day/:title:output_ext",
            Self::Pretty => "/:categories/:year/:month/:day/:title/",
            Self::Ordinal => "/:categories/:year/:y_day/:title:output_ext",
            Self::Weekdate => "/:categories/:year/W:week/:short_day/:title:output_ext",
            Self::None => "/:categories/:title:output_ext",
        }
    }
}

#[derive(Default, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ExplicitPermalink(KString);

impl ExplicitPermalink {
    pub fn from_unchecked(value: &str) -> Self {
        Self(KString::from_ref(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ExplicitPermalink {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(fmt)
    }
}

impl TryFrom<&str> for ExplicitPermalink {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if !value.starts_with('/') {
            Err("Permalinks must be absolute paths")
        } else {
            Ok(Self(KString::from_ref(value)))
        }
    }
}

impl std::ops::Deref for ExplicitPermalink {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for ExplicitPermalink {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_alias() {
        let actual = Permalink::try_from("pretty").unwrap();
        assert_eq!(actual, Permalink::Alias(PermalinkAlias::Pretty));
        assert!(actual.is_pretty());
        assert_eq!(actual.template(), "/:categories/:year/:month/:day/:title/");
    }

    #[test]
    fn parse_explicit() {
        let actual = Permalink::try_from("/blog/:title").unwrap();
        assert_eq!(
            actual,
            Permalink::Explicit(ExplicitPermalink::from_unchecked("/blog/:title"))
        );
        assert!(!actual.is_pretty());
    }

    #[test]
    fn parse_unrecognized() {
        let actual = Permalink::try_from("fancy");
        assert!(actual.unwrap_err().contains("`fancy`"));
    }

    #[test]
    fn default_is_date() {
        assert_eq!(Permalink::default().as_str(), "date");
    }

    #[test]
    fn display_round_trips() {
        for name in PermalinkAlias::NAMES {
            let permalink = Permalink::try_from(*name).unwrap();
            assert_eq!(&permalink.to_string(), name);
        }
    }
}
