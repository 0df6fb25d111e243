use crate::Result;
use crate::SourcePath;
use crate::Status;

/// Names Jekyll leaves out of a build unless they are listed under `include`.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".*",
    "_*",
    "#*",
    "*~",
    "/node_modules/",
    "/vendor/",
    "/Gemfile",
    "/Gemfile.lock",
];

/// Underscore directories that hold documents and are always walked.
pub const CONTENT_DIRS: &[&str] = &["_posts", "_drafts"];

#[derive(Debug, Clone)]
pub struct Source {
    root: std::path::PathBuf,
    ignore: ignore::gitignore::Gitignore,
}

impl Source {
    /// Build the matcher: default exclusions, then `excludes`, then the whitelisted
    /// `includes`.  The last matching line wins.
    pub fn new<'i>(
        root: &std::path::Path,
        excludes: impl IntoIterator<Item = &'i str>,
        includes: impl IntoIterator<Item = &'i str>,
    ) -> Result<Self> {
        let mut ignore = ignore::gitignore::GitignoreBuilder::new(root);
        let content_dirs = CONTENT_DIRS.iter().map(|dir| format!("!/{dir}/"));
        let excludes = excludes.into_iter().map(anchor_exclude);
        let includes = includes
            .into_iter()
            .map(|line| format!("!/{}", line.trim_matches('/')));
        let lines = DEFAULT_EXCLUDES
            .iter()
            .map(|line| (*line).to_owned())
            .chain(content_dirs)
            .chain(excludes)
            .chain(includes);
        for line in lines {
            ignore.add_line(None, &line).map_err(|e| {
                Status::new("Invalid exclude or include entry")
                    .with_source(e)
                    .context_with(|c| c.insert("Entry", line.clone()))
            })?;
        }
        let ignore = ignore
            .build()
            .map_err(|e| Status::new("Invalid exclude or include entry").with_source(e))?;

        let source = Self {
            root: root.to_owned(),
            ignore,
        };
        Ok(source)
    }

    pub fn from_config(config: &quire_config::Config) -> Result<Self> {
        Self::new(
            &config.root,
            config.exclude.iter().map(|s| s.as_str()),
            config.include.iter().map(|p| p.as_str()),
        )
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn includes_file(&self, file: &std::path::Path) -> bool {
        let is_dir = false;
        self.includes_path(file, is_dir)
    }

    pub fn includes_dir(&self, dir: &std::path::Path) -> bool {
        let is_dir = true;
        self.includes_path(dir, is_dir)
    }

    /// Every included file under the root, sorted by name within each directory.
    pub fn iter(&self) -> impl Iterator<Item = SourcePath> + '_ {
        walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| self.includes_entry(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(move |e| SourcePath::from_root(&self.root, e.path()))
    }

    fn includes_path(&self, path: &std::path::Path, is_dir: bool) -> bool {
        if path == self.root {
            return true;
        }

        let parent = path.parent();
        if let Some(parent) = parent {
            if parent.starts_with(&self.root) && !self.includes_path(parent, true) {
                return false;
            }
        }

        self.includes_path_leaf(path, is_dir)
    }

    fn includes_path_leaf(&self, path: &std::path::Path, is_dir: bool) -> bool {
        match self.ignore.matched(path, is_dir) {
            ignore::Match::None => true,
            ignore::Match::Ignore(glob) => {
                log::trace!("{:?}: excluded by {:?}", path, glob.original());
                false
            }
            ignore::Match::Whitelist(glob) => {
                log::trace!("{:?}: included by {:?}", path, glob.original());
                true
            }
        }
    }

    fn includes_entry(&self, entry: &walkdir::DirEntry) -> bool {
        let file = entry.path();

        // Assumption: The parent paths will have been checked before we even get to this point.
        let is_dir = entry.file_type().is_dir();
        self.includes_path_leaf(file, is_dir)
    }
}

/// Exclusions name paths from the source root, except bare globs like `*.log` which apply
/// at any depth.
fn anchor_exclude(line: &str) -> String {
    let line = line.trim();
    let is_bare_glob = !line.contains('/') && line.contains(['*', '?', '[']);
    if is_bare_glob || line.starts_with('!') {
        line.to_owned()
    } else {
        format!("/{}", line.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    macro_rules! assert_includes_dir {
        ($root:expr, $excludes:expr, $includes:expr, $test:expr, $included:expr) => {
            let root = $root;
            let files = Source::new(
                std::path::Path::new(root),
                $excludes.iter().copied(),
                $includes.iter().copied(),
            )
            .unwrap();
            assert_eq!(files.includes_dir(std::path::Path::new($test)), $included);
        };
    }
    macro_rules! assert_includes_file {
        ($root:expr, $excludes:expr, $includes:expr, $test:expr, $included:expr) => {
            let root = $root;
            let files = Source::new(
                std::path::Path::new(root),
                $excludes.iter().copied(),
                $includes.iter().copied(),
            )
            .unwrap();
            assert_eq!(files.includes_file(std::path::Path::new($test)), $included);
        };
    }

    #[test]
    fn files_includes_root_dir() {
        assert_includes_dir!("/srv/blog", NONE, NONE, "/srv/blog", true);

        assert_includes_dir!("./", NONE, NONE, "./", true);
    }

    #[test]
    fn files_includes_child_dir() {
        assert_includes_dir!("/srv/blog", NONE, NONE, "/srv/blog/assets", true);

        assert_includes_dir!("./", NONE, NONE, "./assets", true);
    }

    #[test]
    fn files_includes_file() {
        assert_includes_file!("/srv/blog", NONE, NONE, "/srv/blog/about.md", true);

        assert_includes_file!("./", NONE, NONE, "./about.md", true);
    }

    #[test]
    fn files_excludes_hidden_and_underscored() {
        assert_includes_file!("/srv/blog", NONE, NONE, "/srv/blog/.gitignore", false);
        assert_includes_file!("/srv/blog", NONE, NONE, "/srv/blog/_config.yml", false);
        assert_includes_dir!("/srv/blog", NONE, NONE, "/srv/blog/_site", false);
        assert_includes_file!("/srv/blog", NONE, NONE, "/srv/blog/notes.md~", false);
        assert_includes_file!("/srv/blog", NONE, NONE, "/srv/blog/Gemfile", false);
    }

    #[test]
    fn files_walks_content_dirs() {
        assert_includes_dir!("/srv/blog", NONE, NONE, "/srv/blog/_posts", true);
        assert_includes_file!(
            "/srv/blog",
            NONE,
            NONE,
            "/srv/blog/_posts/2020-01-01-hello.md",
            true
        );
        assert_includes_dir!("/srv/blog", NONE, NONE, "/srv/blog/_drafts", true);
        assert_includes_dir!("/srv/blog", NONE, NONE, "/srv/blog/_layouts", false);
    }

    #[test]
    fn files_not_excluded_by_parent() {
        assert_includes_file!(
            "/tmp/.foo/blog",
            NONE,
            NONE,
            "/tmp/.foo/blog/about.md",
            true
        );
    }

    #[test]
    fn files_exclude_entries() {
        let excludes = ["README.md", "docs/drafts", "*.log"];
        assert_includes_file!("/srv/blog", excludes, NONE, "/srv/blog/README.md", false);
        assert_includes_file!(
            "/srv/blog",
            excludes,
            NONE,
            "/srv/blog/guides/README.md",
            true
        );
        assert_includes_dir!("/srv/blog", excludes, NONE, "/srv/blog/docs/drafts", false);
        assert_includes_file!(
            "/srv/blog",
            excludes,
            NONE,
            "/srv/blog/docs/drafts/wip.md",
            false
        );
        assert_includes_file!("/srv/blog", excludes, NONE, "/srv/blog/logs/build.log", false);
    }

    #[test]
    fn files_include_entries_win() {
        let includes = ["_pages", ".htaccess"];
        assert_includes_dir!("/srv/blog", NONE, includes, "/srv/blog/_pages", true);
        assert_includes_file!(
            "/srv/blog",
            NONE,
            includes,
            "/srv/blog/_pages/about.md",
            true
        );
        assert_includes_file!("/srv/blog", NONE, includes, "/srv/blog/.htaccess", true);
        assert_includes_file!("/srv/blog", NONE, includes, "/srv/blog/.env", false);
    }

    #[test]
    fn anchor_exclude_forms() {
        assert_eq!(anchor_exclude("README.md"), "/README.md");
        assert_eq!(anchor_exclude("/vendor"), "/vendor");
        assert_eq!(anchor_exclude("*.log"), "*.log");
        assert_eq!(anchor_exclude("docs/*.md"), "/docs/*.md");
    }
}
