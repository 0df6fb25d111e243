use std::path;

use anyhow::Context as _;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ConfigArgs {
    /// Config file to use [default: _config.yml in this or a parent directory]
    #[arg(short, long, value_name = "FILE")]
    config: Option<path::PathBuf>,

    /// Include drafts
    #[arg(long)]
    drafts: bool,
}

impl ConfigArgs {
    pub(crate) fn load_config(&self) -> anyhow::Result<quire::Config> {
        let mut config = if let Some(config_path) = self.config.as_deref() {
            quire::Config::from_file(config_path).with_context(|| {
                format!("Error reading config file {}", config_path.display())
            })?
        } else {
            let cwd = std::env::current_dir().context("Failed to read the current directory")?;
            quire::Config::from_cwd(cwd)?
        };

        if self.drafts {
            config.show_drafts = true;
        }

        Ok(config)
    }

    pub(crate) fn load_site(&self) -> anyhow::Result<quire::Site> {
        let config = self.load_config()?;
        quire::Site::load(config)
    }
}
