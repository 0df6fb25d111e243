use quire::quire_config::ContentType;
use quire::quire_core::content_type_for;
use relative_path::RelativePathBuf;

use crate::args;

/// Print site debug information
#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
pub(crate) enum DebugCommands {
    /// Prints post-processed config
    Config {
        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Prints plugins in the order they are applied
    Plugins {
        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Prints the default front matter resolved for a document
    Defaults {
        /// Path of the document, relative to the site root
        path: String,

        /// Content type (posts, pages, drafts or a collection) [default: inferred from path]
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<String>,

        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Print files that are part of the build
    Files {
        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Prints the theme the site is rendered with
    Theme {
        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Print the URL each document is rendered to
    Pages {
        /// Print full URLs, including the site's `url` and `baseurl`
        #[arg(long)]
        absolute: bool,

        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },
}

impl DebugCommands {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Config { config } => {
                let config = config.load_config()?;
                println!("{config}");
            }
            Self::Plugins { config } => {
                let config = config.load_config()?;
                for plugin in config.resolve_plugins() {
                    println!("{plugin}");
                }
            }
            Self::Defaults {
                path,
                content_type,
                config,
            } => {
                let config = config.load_config()?;
                let path = RelativePathBuf::from(path.as_str());
                let content_type = content_type
                    .as_deref()
                    .map(ContentType::from)
                    .unwrap_or_else(|| content_type_for(&path));
                let defaults = config.resolve_defaults(&path, &content_type);
                log::debug!("{path} resolved as {content_type}");
                if !defaults.is_empty() {
                    println!("{defaults}");
                }
            }
            Self::Files { config } => {
                let site = config.load_site()?;
                for path in site.source().iter() {
                    println!("{}", path.rel_path);
                }
            }
            Self::Theme { config } => {
                let config = config.load_config()?;
                match config.effective_theme() {
                    Some(theme) => println!("{theme}"),
                    None => log::warn!("No `theme` or `remote_theme` is set"),
                }
                if let Some(remote_theme) = &config.remote_theme {
                    println!("ref: {}", remote_theme.git_ref_or_default());
                }
            }
            Self::Pages { absolute, config } => {
                let site = config.load_site()?;
                for page in site.pages()? {
                    let url = if *absolute {
                        site.config().absolute_url(&page.url)
                    } else {
                        page.url
                    };
                    println!("{url} <- {}", page.path.rel_path);
                }
            }
        }

        Ok(())
    }
}
