use std::fmt;

use crate::KString;

/// A theme hosted in a remote repository, written as `owner/name` with an optional `@ref`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteTheme {
    pub owner: KString,
    pub name: KString,
    pub git_ref: Option<KString>,
}

impl RemoteTheme {
    /// The reference to check out; themes without one track the default branch.
    pub fn git_ref_or_default(&self) -> &str {
        self.git_ref.as_deref().unwrap_or("HEAD")
    }
}

impl fmt::Display for RemoteTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if let Some(git_ref) = &self.git_ref {
            write!(f, "@{git_ref}")?;
        }
        Ok(())
    }
}

impl TryFrom<&str> for RemoteTheme {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let invalid = || format!("remote theme `{value}` must look like `owner/name[@ref]`");

        let (repo, git_ref) = match value.trim().split_once('@') {
            Some((repo, git_ref)) if !git_ref.is_empty() => (repo, Some(git_ref)),
            Some(_) => return Err(invalid()),
            None => (value.trim(), None),
        };
        let (owner, name) = repo.split_once('/').ok_or_else(invalid)?;
        let is_part = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !is_part(owner) || !is_part(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: KString::from_ref(owner),
            name: KString::from_ref(name),
            git_ref: git_ref.map(KString::from_ref),
        })
    }
}

impl TryFrom<String> for RemoteTheme {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<RemoteTheme> for String {
    fn from(theme: RemoteTheme) -> Self {
        theme.to_string()
    }
}
