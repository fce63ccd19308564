//! Logger configuration
//!
//! A logger can be described in TOML:
//!
//! ```toml
//! level = "warn"
//! flags = "DATE | TIME | MSG_PREFIX"
//! output = "/var/log/app.log"
//! ```
//!
//! Every key is optional. Without `output` lines go to standard error.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::flags::Flags;
use crate::global::DEFAULT_FLAGS;
use crate::level::Level;
use crate::logger::Logger;

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lowest level written (default: info)
    #[serde(default)]
    pub level: Level,

    /// Decoration flags (default: "DATE | TIME | MSG_PREFIX")
    #[serde(default = "default_flags")]
    pub flags: Flags,

    /// File to append lines to, standard error when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

fn default_flags() -> Flags {
    DEFAULT_FLAGS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::default(),
            flags: default_flags(),
            output: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Build a logger from this configuration
    ///
    /// An output file is created if missing and always appended to.
    pub fn build(&self) -> Result<Logger> {
        let logger = match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).context("Failed to create log directory")?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?;
                tracing::debug!("Logging to {}", path.display());
                Logger::new(file, self.flags)
            }
            None => Logger::stderr(self.flags),
        };
        logger.set_level(self.level);
        Ok(logger)
    }
}
