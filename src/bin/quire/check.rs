use crate::args;

/// Validate the configuration and every document it applies to
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct CheckArgs {
    /// Plugins installed for the rendering engine; every configured plugin must be one of them
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    installed_plugins: Option<Vec<String>>,

    #[command(flatten, next_help_heading = "CONFIG")]
    config: args::ConfigArgs,
}

impl CheckArgs {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        let site = self.config.load_site()?;

        if let Some(installed) = &self.installed_plugins {
            site.config()
                .check_plugins(installed.iter().map(|s| s.as_str()))?;
        }

        let pages = site.pages()?;
        log::info!("Resolved {} documents", pages.len());

        let conflicts = quire::conflicts(&pages);
        for (url, paths) in &conflicts {
            let paths: Vec<_> = paths.iter().map(|p| p.as_str()).collect();
            log::warn!("Conflict: `{url}` is claimed by {}", paths.join(", "));
        }

        println!("Configuration OK");
        Ok(())
    }
}
