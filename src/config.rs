//! Configuration: optional TOML file, CLI overrides applied on top, defaults
//! for everything.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::heat::HeatSchemes;

/// Names skipped by the scanner unless the config says otherwise.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    ".idea",
    ".vscode",
    "__pycache__",
    ".pytest_cache",
    "dist",
    "build",
    "target",
];

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub heat: HeatSchemes,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Exact entry names to skip
    pub exclude: Vec<String>,
    /// Hidden names that should still be scanned
    pub allow_hidden: Vec<String>,
    /// History window for change rates
    pub window_days: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            allow_hidden: Vec::new(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    /// Widest heat bar, in cells
    pub bar_width: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|err| match err {
            ConfigError::Parse { details, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                details,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|err| ConfigError::Parse {
            path: Default::default(),
            details: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.window_days == 0 {
            return Err(ConfigError::Invalid {
                details: "scan.window_days must be at least 1".to_string(),
            });
        }
        if self.view.bar_width == 0 {
            return Err(ConfigError::Invalid {
                details: "view.bar_width must be at least 1".to_string(),
            });
        }
        self.heat.size.validate("size")?;
        self.heat.change_rate.validate("change_rate")?;
        Ok(())
    }
}
