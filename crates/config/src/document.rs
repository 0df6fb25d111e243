use std::fmt;

use crate::Frontmatter;
use crate::Result;

/// A content file split into its front matter and body.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct Document {
    front: Frontmatter,
    content: String,
    has_front: bool,
}

impl Document {
    pub fn new(front: Frontmatter, content: String) -> Self {
        Self {
            front,
            content,
            has_front: true,
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let (front, body, has_front) = match split_document(content) {
            Some((front, body)) => (front, body, true),
            None => (None, content, false),
        };
        let front = front
            .map(parse_frontmatter)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            front,
            content: body.to_owned(),
            has_front,
        })
    }

    /// Whether the file opened with a front matter block, even an empty one.
    ///
    /// Jekyll only renders files that do.
    pub fn has_front_matter(&self) -> bool {
        self.has_front
    }

    pub fn front(&self) -> &Frontmatter {
        &self.front
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_parts(self) -> (Frontmatter, String) {
        let Self { front, content, .. } = self;
        (front, content)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let front = self.front.to_string();
        if front.is_empty() && !self.has_front {
            write!(f, "{}", self.content)
        } else if front.is_empty() {
            write!(f, "---\n---\n{}", self.content)
        } else {
            write!(f, "---\n{}\n---\n{}", front, self.content)
        }
    }
}

fn parse_frontmatter(front: &str) -> Result<Frontmatter> {
    let value: serde_yaml::Value = serde_yaml::from_str(front)?;
    match value {
        serde_yaml::Value::Null => Ok(Frontmatter::empty()),
        serde_yaml::Value::Mapping(mapping) => Ok(mapping.into()),
        _ => Err(crate::ConfigError::schema(
            "front matter must be a mapping of keys to values",
        )),
    }
}

static FRONT_MATTER: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::RegexBuilder::new(r"\A---\s*\r?\n([\s\S]*?\n)?---\s*(?:\r?\n|\z)(.*)")
        .dot_matches_new_line(true)
        .build()
        .unwrap()
});

/// Returns `None` when there is no front matter block at all.
fn split_document(content: &str) -> Option<(Option<&str>, &str)> {
    let captures = FRONT_MATTER.captures(content)?;
    let front_split = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let content_split = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    if front_split.trim().is_empty() {
        Some((None, content_split))
    } else {
        Some((Some(front_split), content_split))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_document_empty() {
        assert_eq!(split_document(""), None);
    }

    #[test]
    fn split_document_no_front_matter() {
        assert_eq!(split_document("Body"), None);
    }

    #[test]
    fn split_document_empty_front_matter() {
        let input = "---\n---\nBody";
        assert_eq!(split_document(input), Some((None, "Body")));
    }

    #[test]
    fn split_document_empty_body() {
        let input = "---\nlayout: post\n---\n";
        assert_eq!(split_document(input), Some((Some("layout: post\n"), "")));
    }

    #[test]
    fn split_document_front_matter_and_body() {
        let input = "---\nlayout: post\n---\nbody";
        assert_eq!(split_document(input), Some((Some("layout: post\n"), "body")));
    }

    #[test]
    fn split_document_no_new_line_after_front_matter() {
        let input = "invalid_front_matter---\nbody";
        assert_eq!(split_document(input), None);
    }

    #[test]
    fn split_document_multiline_body() {
        let input = "---\nlayout: post\n---\nfirst\n---\nsecond";
        assert_eq!(
            split_document(input),
            Some((Some("layout: post\n"), "first\n---\nsecond"))
        );
    }

    #[test]
    fn parse_front_matter() {
        let doc = Document::parse("---\ntitle: Adapter\nexcerpt: Wrapping APIs\n---\nBody").unwrap();
        assert!(doc.has_front_matter());
        assert_eq!(doc.front().get_str("title"), Some("Adapter"));
        assert_eq!(doc.front().get_str("excerpt"), Some("Wrapping APIs"));
        assert_eq!(doc.content(), "Body");
    }

    #[test]
    fn parse_without_front_matter() {
        let doc = Document::parse("plain text").unwrap();
        assert!(!doc.has_front_matter());
        assert!(doc.front().is_empty());
        assert_eq!(doc.content(), "plain text");
    }

    #[test]
    fn parse_malformed_front_matter() {
        let err = Document::parse("---\ntitle: [unterminated\n---\nBody").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn parse_non_mapping_front_matter() {
        let err = Document::parse("---\n- one\n- two\n---\nBody").unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn display_empty() {
        let doc = Document::parse("").unwrap();
        assert_eq!(&doc.to_string(), "");
    }

    #[test]
    fn display_empty_front() {
        let doc = Document::parse("---\n---\nbody").unwrap();
        assert_eq!(&doc.to_string(), "---\n---\nbody");
    }

    #[test]
    fn display_both() {
        let mut front = Frontmatter::empty();
        front.insert("layout", "single");
        let doc = Document::new(front, "body".to_owned());
        assert_eq!(&doc.to_string(), "---\nlayout: single\n---\nbody");
    }
}
