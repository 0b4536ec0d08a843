use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Environment variables with this prefix override file settings,
/// e.g. `CSV_PERMUTE_DELIMITER=";"`
pub const ENV_PREFIX: &str = "CSV_PERMUTE_";

/// Dialect and encoding defaults that may come from a file, the
/// environment, or the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub delimiter: String,
    pub quotechar: String,
    pub encoding: Option<String>,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            quotechar: "\"".to_string(),
            encoding: None,
            seed: None,
        }
    }
}

/// Values given explicitly on the command line. Unset fields leave the
/// lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotechar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Layers defaults, an optional TOML file, the environment and CLI flags
pub struct ConfigService {
    config_file: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigService {
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self {
            config_file,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    fn figment(&self, overrides: &SettingsOverrides) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));

        if let Some(path) = &self.config_file {
            ensure_exists(path)?;
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(Env::prefixed(&self.env_prefix))
            .merge(Serialized::defaults(overrides)))
    }

    pub fn load(&self, overrides: &SettingsOverrides) -> Result<Settings> {
        let settings = self.figment(overrides)?.extract::<Settings>()?;
        tracing::debug!(?settings, "Resolved settings");
        Ok(settings)
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(AppError::ValidationError(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    Ok(())
}
