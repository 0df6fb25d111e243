use std::fmt;

use relative_path::RelativePath;

use crate::ConfigError;
use crate::Frontmatter;
use crate::KString;
use crate::Result;

/// The kind of content a document belongs to, as named in a scope's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Posts,
    Pages,
    Drafts,
    /// A named collection other than posts.
    Collection(KString),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Posts => "posts",
            Self::Pages => "pages",
            Self::Drafts => "drafts",
            Self::Collection(name) => name.as_str(),
        }
    }
}

impl From<&str> for ContentType {
    fn from(name: &str) -> Self {
        match name {
            "posts" => Self::Posts,
            "pages" => Self::Pages,
            "drafts" => Self::Drafts,
            other => Self::Collection(KString::from_ref(other)),
        }
    }
}

impl From<String> for ContentType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.as_str().to_owned()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the site's `defaults` list.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct DefaultRule {
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub values: Frontmatter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scope {
    /// Path prefix or glob, relative to the source root.  Empty matches everything.
    #[serde(default)]
    pub path: KString,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
}

impl Scope {
    pub fn matches(&self, path: &RelativePath, content_type: &ContentType) -> bool {
        let type_matches = self
            .content_type
            .as_ref()
            .is_none_or(|scope_type| scope_type == content_type);
        type_matches && self.matches_path(path)
    }

    pub fn matches_path(&self, path: &RelativePath) -> bool {
        let scope = normalize_scope_path(&self.path);
        if scope.is_empty() {
            return true;
        }

        let path = path.normalize();
        if is_glob(scope) {
            let Ok(glob) = compile_glob(scope) else {
                return false;
            };
            let mut current = Some(path.as_relative_path());
            while let Some(candidate) = current {
                if glob.is_match(candidate.as_str()) {
                    return true;
                }
                current = candidate.parent();
            }
            false
        } else {
            path.starts_with(scope)
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let scope = normalize_scope_path(&self.path);
        if is_glob(scope) {
            compile_glob(scope).map_err(|e| {
                ConfigError::field(
                    "defaults",
                    format!("has an invalid scope path `{}`: {e}", self.path),
                )
            })?;
        }
        Ok(())
    }
}

/// Fold the values of every rule matching `path` and `content_type`, in declaration order.
///
/// A later rule overwrites the keys it shares with earlier ones.
pub fn resolve_defaults<'r>(
    rules: impl IntoIterator<Item = &'r DefaultRule>,
    path: &RelativePath,
    content_type: &ContentType,
) -> Frontmatter {
    rules
        .into_iter()
        .filter(|rule| rule.scope.matches(path, content_type))
        .fold(Frontmatter::empty(), |resolved, rule| {
            log::trace!("{path}: applying defaults for scope `{}`", rule.scope.path);
            resolved.overlay(&rule.values)
        })
}

fn normalize_scope_path(path: &str) -> &str {
    let path = path.trim();
    let path = path.strip_prefix("./").unwrap_or(path);
    let path = path.trim_matches('/');
    if path == "." { "" } else { path }
}

fn is_glob(path: &str) -> bool {
    path.contains(['*', '?', '[', '{'])
}

/// `*` and `?` stay within one path component; `**` crosses them.
fn compile_glob(glob: &str) -> std::result::Result<globset::GlobMatcher, globset::Error> {
    let glob = globset::GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()?;
    Ok(glob.compile_matcher())
}

#[cfg(test)]
mod test {
    use super::*;

    fn rules(yaml: &str) -> Vec<DefaultRule> {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn front(yaml: &str) -> Frontmatter {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn resolve(rules: &[DefaultRule], path: &str, content_type: ContentType) -> Frontmatter {
        resolve_defaults(rules, RelativePath::new(path), &content_type)
    }

    const POSTS_AND_PAGES: &str = r#"
- scope:
    path: ""
    type: posts
  values:
    layout: post
    comments: false
- scope:
    path: ""
    type: pages
  values:
    layout: single
"#;

    #[test]
    fn posts_and_pages() {
        let rules = rules(POSTS_AND_PAGES);
        assert_eq!(
            resolve(&rules, "_posts/2020-01-01-adapter.md", ContentType::Posts),
            front("layout: post\ncomments: false\n")
        );
        assert_eq!(
            resolve(&rules, "about.md", ContentType::Pages),
            front("layout: single\n")
        );
    }

    #[test]
    fn no_matching_scope_is_empty() {
        let rules = rules(POSTS_AND_PAGES);
        let actual = resolve(&rules, "_drafts/wip.md", ContentType::Drafts);
        assert!(actual.is_empty());
    }

    #[test]
    fn later_rules_override_earlier() {
        let rules = rules(
            r#"
- scope:
    path: ""
  values:
    layout: single
    author_profile: true
- scope:
    path: "_posts"
    type: posts
  values:
    layout: post
    read_time: true
"#,
        );
        let actual = resolve(&rules, "_posts/2020-01-01-adapter.md", ContentType::Posts);
        assert_eq!(
            actual,
            front("layout: post\nauthor_profile: true\nread_time: true\n")
        );
    }

    #[test]
    fn declaration_order_wins_over_specificity() {
        let rules = rules(
            r#"
- scope:
    path: "_posts"
  values:
    layout: post
- scope:
    path: ""
  values:
    layout: single
"#,
        );
        let actual = resolve(&rules, "_posts/a.md", ContentType::Posts);
        assert_eq!(actual.get_str("layout"), Some("single"));
    }

    #[test]
    fn scope_without_type_matches_every_type() {
        let scope = Scope {
            path: "".into(),
            content_type: None,
        };
        assert!(scope.matches(RelativePath::new("a.md"), &ContentType::Pages));
        assert!(scope.matches(RelativePath::new("_posts/a.md"), &ContentType::Posts));
    }

    #[test]
    fn scope_path_is_component_prefix() {
        let scope = Scope {
            path: "projects".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("projects/foo.md")));
        assert!(scope.matches_path(RelativePath::new("./projects/foo.md")));
        assert!(!scope.matches_path(RelativePath::new("projects-old/foo.md")));
        assert!(!scope.matches_path(RelativePath::new("about.md")));
    }

    #[test]
    fn scope_path_ignores_slashes_and_dot() {
        for path in ["/projects/", "./projects", "projects/"] {
            let scope = Scope {
                path: path.into(),
                content_type: None,
            };
            assert!(scope.matches_path(RelativePath::new("projects/foo.md")), "{path}");
        }
        let scope = Scope {
            path: ".".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("anything.md")));
    }

    #[test]
    fn scope_glob() {
        let scope = Scope {
            path: "section/*/special-page.html".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("section/a/special-page.html")));
        assert!(!scope.matches_path(RelativePath::new("section/a/b/special-page.html")));

        let scope = Scope {
            path: "assets/**".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("assets/images/logo.png")));
    }

    #[test]
    fn scope_glob_matches_parent_directory() {
        let scope = Scope {
            path: "docs/v?".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("docs/v1/intro.md")));
        assert!(!scope.matches_path(RelativePath::new("docs/v10/intro.md")));
    }

    #[test]
    fn scope_glob_character_class() {
        let scope = Scope {
            path: "_posts/[0-9]*".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("_posts/2020-06-14-adapter.md")));
        assert!(!scope.matches_path(RelativePath::new("_posts/adapter.md")));

        let scope = Scope {
            path: "_posts/20[12][0-9]".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("_posts/2019/adapter.md")));
        assert!(!scope.matches_path(RelativePath::new("_posts/2009/adapter.md")));
    }

    #[test]
    fn scope_glob_alternatives() {
        let scope = Scope {
            path: "{_posts,_drafts}/*.md".into(),
            content_type: None,
        };
        assert!(scope.matches_path(RelativePath::new("_drafts/wip.md")));
        assert!(!scope.matches_path(RelativePath::new("_pages/about.md")));
    }

    #[test]
    fn scope_invalid_glob() {
        let scope = Scope {
            path: "_posts/[0-9".into(),
            content_type: None,
        };
        let err = scope.validate().unwrap_err();
        assert!(err.is_schema());
        assert_eq!(err.schema_field(), Some("defaults"));
        assert!(!scope.matches_path(RelativePath::new("_posts/2020.md")));
    }

    #[test]
    fn content_type_names() {
        assert_eq!(ContentType::from("posts"), ContentType::Posts);
        assert_eq!(
            ContentType::from("recipes"),
            ContentType::Collection("recipes".into())
        );
        assert_eq!(ContentType::from("recipes").to_string(), "recipes");
    }
}
