use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Self::load_or_init_in(&home.join(".commsbot"))
    }

    /// Loads `config.toml` from `commsbot_dir`, writing a default one first
    /// if none exists.
    pub fn load_or_init_in(commsbot_dir: &Path) -> Result<Self> {
        let config_path = commsbot_dir.join("config.toml");

        if !commsbot_dir.exists() {
            fs::create_dir_all(commsbot_dir).context("Failed to create .commsbot directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            Ok(config)
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config.config_path.display(), "wrote default config");
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
