//! Configuration loader
//!
//! Resolves which `vipsgen.json` applies: an explicit path, then the
//! `VIPSGEN_CONFIG` environment variable, then the nearest file walking up
//! from the working directory. No file means the built-in defaults.

use std::path::Path;

use super::Config;
use crate::error::{Error, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "VIPSGEN_CONFIG";

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let env_value = std::env::var(CONFIG_ENV).ok();
        let cwd = std::env::current_dir().ok();
        Self::load_with(explicit, env_value.as_deref(), cwd.as_deref())
    }

    /// Resolution with the environment passed in. An empty `env_value`
    /// counts as unset.
    pub fn load_with(
        explicit: Option<&Path>,
        env_value: Option<&str>,
        cwd: Option<&Path>,
    ) -> Result<Config> {
        if let Some(path) = explicit {
            return Self::load_required(path);
        }

        if let Some(path) = env_value.filter(|value| !value.trim().is_empty()) {
            tracing::debug!("Using config from {}: {}", CONFIG_ENV, path);
            return Self::load_required(Path::new(path));
        }

        match cwd {
            Some(cwd) => Self::load_from_path(cwd),
            None => Ok(Config::default()),
        }
    }

    /// Load the nearest config at or above `path`, or the defaults.
    pub fn load_from_path(path: &Path) -> Result<Config> {
        match Config::find_config_file(path) {
            Some(config_path) => {
                tracing::debug!("Found config at {:?}", config_path);
                Config::load_from_file(&config_path)
            }
            None => {
                tracing::debug!("No config found from {:?}, using defaults", path);
                Ok(Config::default())
            }
        }
    }

    fn load_required(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Config::load_from_file(path)
    }
}
