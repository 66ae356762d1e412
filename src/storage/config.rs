//! Configuration handling for Contact Book
//!
//! File locations come from, in increasing priority: built-in defaults, a
//! config file (`--config`, else `./contact-book.toml`, else
//! `~/.config/contact-book/config.toml`), and command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "contact-book.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Locations of the files the contact book reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSV contact store
    pub contacts_file: PathBuf,

    /// JSON export/import snapshot
    pub interchange_file: PathBuf,

    /// Failure log
    pub error_log: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contacts_file: PathBuf::from("contacts.csv"),
            interchange_file: PathBuf::from("contacts.json"),
            error_log: PathBuf::from("error_log.txt"),
        }
    }
}

/// Path overrides from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub contacts_file: Option<PathBuf>,
    pub interchange_file: Option<PathBuf>,
    pub error_log: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `explicit` or the default locations, then
    /// applies `overrides`
    pub fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::from_file(path)?
            }
            None => match Self::discover() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        Ok(config.with_overrides(overrides))
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "contact-book", "contact-book")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Finds the first config file that exists, local before global
    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }

        Self::global_config_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Reads a config file, resolving relative paths against its directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Parses config file contents
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn relative_to(self, base: &Path) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };

        Self {
            contacts_file: resolve(self.contacts_file),
            interchange_file: resolve(self.interchange_file),
            error_log: resolve(self.error_log),
        }
    }

    /// Replaces any path given on the command line
    pub fn with_overrides(self, overrides: Overrides) -> Self {
        Self {
            contacts_file: overrides.contacts_file.unwrap_or(self.contacts_file),
            interchange_file: overrides.interchange_file.unwrap_or(self.interchange_file),
            error_log: overrides.error_log.unwrap_or(self.error_log),
        }
    }

    /// Creates a config with every file placed in `dir`, using default names
    pub fn in_dir(dir: &Path) -> Self {
        Self::default().relative_to(dir)
    }
}
