use quire_config::ContentType;
use relative_path::RelativePath;

use crate::SourcePath;

/// Extensions of files that can be rendered as documents.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["md", "markdown", "mkd", "mkdn", "html", "htm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Rendered with front matter and defaults applied.
    Document(ContentType),
    /// Copied to the output unchanged.
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: SourcePath,
    pub kind: ContentKind,
}

impl ContentFile {
    /// Files under `_posts` and `_drafts` are documents when they have a template extension;
    /// elsewhere a file is a page only when it opens with front matter.
    pub fn classify(path: SourcePath, has_front_matter: bool) -> Self {
        let content_type = content_type_for(&path.rel_path);
        let is_document = match content_type {
            ContentType::Posts | ContentType::Drafts => {
                has_template_extension(&path.rel_path) || has_front_matter
            }
            _ => has_front_matter,
        };
        let kind = if is_document {
            ContentKind::Document(content_type)
        } else {
            ContentKind::Static
        };
        Self { path, kind }
    }

    pub fn content_type(&self) -> Option<&ContentType> {
        match &self.kind {
            ContentKind::Document(content_type) => Some(content_type),
            ContentKind::Static => None,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, ContentKind::Document(_))
    }
}

/// The content type a path implies from the directory it lives in.
pub fn content_type_for(rel_path: &RelativePath) -> ContentType {
    let rel_path = rel_path.normalize();
    match rel_path.as_str().split('/').next() {
        Some("_posts") => ContentType::Posts,
        Some("_drafts") => ContentType::Drafts,
        _ => ContentType::Pages,
    }
}

pub fn has_template_extension(rel_path: &RelativePath) -> bool {
    rel_path
        .extension()
        .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext))
}
