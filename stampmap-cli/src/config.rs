//! Configuration handling for the Stampmap CLI
//!
//! Supports loading defaults from a stampmap.toml file with CLI argument
//! overrides.

use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub save: SaveConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Document number used when neither the command line nor the mapping
    /// metadata yields one.
    #[serde(default)]
    pub fallback_form_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfig {
    /// Also refresh the unversioned current-mapping copy on every save.
    #[serde(default = "default_true")]
    pub write_current: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            write_current: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from an explicit path, else `stampmap.toml` in
    /// the working directory, else built-in defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let local = Path::new("stampmap.toml");
                local.exists().then(|| local.to_path_buf())
            }
        };

        match candidate {
            Some(p) => {
                log::debug!("loading configuration from {}", p.display());
                let text = std::fs::read_to_string(&p)?;
                Ok(toml::from_str(&text)?)
            }
            None => Ok(Self::default()),
        }
    }
}
