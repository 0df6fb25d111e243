use std::collections::BTreeMap;
use std::io::Read as _;

use anyhow::Context as _;
use itertools::Itertools as _;
use quire_config::Config;
use quire_config::ContentType;
use quire_config::DateTime;
use quire_config::Document;
use quire_config::Frontmatter;
use quire_config::path as qpath;
use quire_core::ContentFile;
use quire_core::ContentKind;
use quire_core::Source;
use quire_core::SourcePath;
use quire_core::content_type_for;
use quire_core::has_template_extension;
use relative_path::RelativePathBuf;
use serde_yaml::Value;

use crate::permalink::Template;
use crate::permalink::Variables;

const FRONT_MATTER_FENCE: &[u8] = b"---";

/// A document ready to hand to the rendering engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub path: SourcePath,
    pub content_type: ContentType,
    /// The document's own front matter over the matching `defaults`, plus the derived
    /// `slug`, `title`, `date` and `categories`.
    pub front: Frontmatter,
    /// URL path relative to the site root, starting with `/`.
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Site {
    config: Config,
    source: Source,
}

impl Site {
    pub fn load(config: Config) -> anyhow::Result<Self> {
        let source = Source::from_config(&config)
            .with_context(|| format!("Failed to set up source `{}`", config.root.display()))?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Every document of the site, in walk order.
    pub fn pages(&self) -> anyhow::Result<Vec<Page>> {
        let mut pages = Vec::new();
        for path in self.source.iter() {
            let in_content_dir = has_template_extension(&path.rel_path)
                && matches!(
                    content_type_for(&path.rel_path),
                    ContentType::Posts | ContentType::Drafts
                );
            if !in_content_dir && !opens_with_front_matter(&path)? {
                log::trace!("{}: no front matter, treating as static", path.rel_path);
                continue;
            }
            let Some(content) = read_text(&path)? else {
                log::trace!("{}: not text, treating as static", path.rel_path);
                continue;
            };
            let document = Document::parse(&content)
                .with_context(|| format!("Failed to parse front matter of `{}`", path.rel_path))?;
            let file = ContentFile::classify(path, document.has_front_matter());
            let ContentKind::Document(content_type) = file.kind else {
                continue;
            };
            if content_type == ContentType::Drafts && !self.config.show_drafts {
                log::debug!("{}: skipping draft", file.path.rel_path);
                continue;
            }
            pages.push(self.plan(file.path, content_type, &document)?);
        }
        Ok(pages)
    }

    /// Resolve the front matter and permalink of a single document.
    pub fn plan(
        &self,
        path: SourcePath,
        content_type: ContentType,
        document: &Document,
    ) -> anyhow::Result<Page> {
        let defaults = self.config.resolve_defaults(&path.rel_path, &content_type);
        let mut front = quire_config::resolve_front_matter(document.front(), &defaults);

        let file_name = path.rel_path.file_name().unwrap_or_default();
        let (stem, ext) = qpath::split_ext(file_name);
        let (file_date, stem) = match content_type {
            ContentType::Pages => (None, stem.to_owned()),
            _ => qpath::parse_file_stem(stem),
        };

        let date = match front.get("date") {
            Some(Value::String(date)) => Some(DateTime::parse(date).with_context(|| {
                format!("`{}` has an invalid date `{date}`", path.rel_path)
            })?),
            Some(Value::Null) | None => file_date,
            Some(_) => anyhow::bail!("`{}` has a date that is not a string", path.rel_path),
        };
        let date = match (date, &content_type) {
            (None, ContentType::Drafts) => modified_time(&path),
            (date, _) => date,
        };
        if content_type == ContentType::Posts && date.is_none() {
            anyhow::bail!(
                "post `{}` has no date in its file name or front matter",
                path.rel_path
            );
        }

        let slug = match front.get_str("slug") {
            Some(slug) => qpath::slugify(slug),
            None => qpath::slugify(&stem),
        };
        if content_type != ContentType::Pages {
            insert_derived(&mut front, "title", qpath::titleize_slug(&slug));
        }
        let categories = categories(&front);

        let mut vars = Variables::new();
        if let Some(date) = date {
            date_variables(&date, &mut vars);
            insert_derived(&mut front, "date", date.to_string());
        }
        let parent = path
            .rel_path
            .parent()
            .map(|p| p.as_str().to_owned())
            .unwrap_or_default();
        vars.insert("title", slug.clone());
        vars.insert("slug", slug.clone());
        vars.insert(
            "categories",
            categories.iter().map(|c| c.to_lowercase()).join("/"),
        );
        vars.insert("path", parent);
        vars.insert("basename", stem.clone());
        vars.insert("name", stem);
        vars.insert("output_ext", output_ext(ext));

        if !categories.is_empty() {
            insert_derived(
                &mut front,
                "categories",
                Value::Sequence(categories.into_iter().map(Value::from).collect()),
            );
        }
        insert_derived(&mut front, "slug", slug);

        let template = match front.get_str("permalink") {
            Some(permalink) => permalink.to_owned(),
            None => self.default_template(&content_type).to_owned(),
        };
        let url = strip_index(&Template::parse(&template).render(&vars));

        Ok(Page {
            path,
            content_type,
            front,
            url,
        })
    }

    fn default_template(&self, content_type: &ContentType) -> &str {
        match content_type {
            ContentType::Pages if self.config.permalink.is_pretty() => "/:path/:basename/",
            ContentType::Pages => "/:path/:basename:output_ext",
            _ => self.config.permalink.template(),
        }
    }
}

/// Derived values only fill keys the document and its defaults left unset.
fn insert_derived(front: &mut Frontmatter, key: &str, value: impl Into<Value>) {
    if front.get(key).is_none_or(Value::is_null) {
        front.insert(key, value);
    }
}

/// URLs claimed by more than one page, with the files claiming them.
pub fn conflicts(pages: &[Page]) -> BTreeMap<&str, Vec<&RelativePathBuf>> {
    let mut claims: BTreeMap<&str, Vec<&RelativePathBuf>> = BTreeMap::new();
    for page in pages {
        claims
            .entry(page.url.as_str())
            .or_default()
            .push(&page.path.rel_path);
    }
    claims.retain(|_, paths| paths.len() > 1);
    claims
}

/// Peek at the first bytes so assets are never read in full.
fn opens_with_front_matter(path: &SourcePath) -> anyhow::Result<bool> {
    let file = std::fs::File::open(&path.abs_path)
        .with_context(|| format!("Failed to read `{}`", path.abs_path.display()))?;
    let mut head = Vec::with_capacity(FRONT_MATTER_FENCE.len());
    file.take(FRONT_MATTER_FENCE.len() as u64)
        .read_to_end(&mut head)
        .with_context(|| format!("Failed to read `{}`", path.abs_path.display()))?;
    Ok(head == FRONT_MATTER_FENCE)
}

fn read_text(path: &SourcePath) -> anyhow::Result<Option<String>> {
    let bytes = std::fs::read(&path.abs_path)
        .with_context(|| format!("Failed to read `{}`", path.abs_path.display()))?;
    Ok(String::from_utf8(bytes).ok())
}

/// Drafts without a date are dated by their last modification.
fn modified_time(path: &SourcePath) -> Option<DateTime> {
    let modified = std::fs::metadata(&path.abs_path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::from_system_time(modified))
}

/// `categories` as a list or a space separated string, plus a single `category`.
fn categories(front: &Frontmatter) -> Vec<String> {
    let mut categories: Vec<String> = match front.get("categories") {
        Some(Value::Sequence(values)) => values
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split_whitespace().map(str::to_owned).collect(),
        _ => Vec::new(),
    };
    if let Some(category) = front.get_str("category") {
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_owned());
        }
    }
    categories
}

fn date_variables(date: &DateTime, vars: &mut Variables) {
    vars.insert("year", date.year().to_string());
    vars.insert("month", format!("{:02}", date.month()));
    vars.insert("i_month", date.month().to_string());
    vars.insert("day", format!("{:02}", date.day()));
    vars.insert("i_day", date.day().to_string());
    vars.insert("short_year", format!("{:02}", date.year().rem_euclid(100)));
    vars.insert("y_day", format!("{:03}", date.ordinal()));
    vars.insert("week", format!("{:02}", date.iso_week()));
    let weekday = date.weekday_name();
    vars.insert("short_day", weekday[..3].to_owned());
    vars.insert("long_day", weekday);
    vars.insert("hour", format!("{:02}", date.hour()));
    vars.insert("minute", format!("{:02}", date.minute()));
    vars.insert("second", format!("{:02}", date.second()));
}

/// Markup renders to HTML; every other extension is kept.
fn output_ext(ext: Option<&str>) -> String {
    match ext {
        Some(ext) if quire_core::TEMPLATE_EXTENSIONS.contains(&ext) => ".html".to_owned(),
        Some(ext) => format!(".{ext}"),
        None => String::new(),
    }
}

fn strip_index(url: &str) -> String {
    if let Some(dir) = url.strip_suffix("index.html") {
        if dir.ends_with('/') {
            return dir.to_owned();
        }
    }
    if let Some(dir) = url.strip_suffix("index/") {
        if dir.ends_with('/') {
            return dir.to_owned();
        }
    }
    url.to_owned()
}
