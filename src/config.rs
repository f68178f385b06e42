use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_BACKEND_URL;

/// Persisted client preferences. The conversation itself is never
/// written to disk.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub provider: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Remember the provider the user last picked.
    pub fn save_provider(id: &str) -> Result<()> {
        let mut config = Self::load().unwrap_or_default();
        config.provider = Some(id.to_string());
        config.save()
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("multichat").join("config.json"))
    }
}

/// CLI flag beats config file beats the built-in default.
pub fn resolve_backend_url(cli: Option<String>, config: &Config) -> String {
    cli.or_else(|| config.backend_url.clone())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}
