// File: src/config.rs
// Handles configuration loading and defaults.
use crate::context::AppContext;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

fn default_backup_suffix() -> String {
    ".backup".to_string()
}

fn default_extension() -> String {
    "ics".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Appended to the original file name to form the backup path
    /// ("meetings.ics" -> "meetings.ics.backup").
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,

    /// Extension (without the dot) selected by the folder scan.
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Match the serde defaults
            backup_suffix: ".backup".to_string(),
            extension: "ics".to_string(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        // Read the file with contextualized error (covers permission/IO issues).
        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        // Parse TOML with contextualized error (covers syntax issues).
        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing. A present-but-broken file is surfaced as a warning rather
    /// than aborting the run.
    pub fn load_or_default(ctx: &dyn AppContext) -> Self {
        match Self::load(ctx) {
            Ok(config) => config,
            Err(e) => {
                if !e.to_string().contains("Config file not found") {
                    log::warn!("{:#}; using defaults", e);
                }
                Self::default()
            }
        }
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)?;
        Ok(())
    }
}
