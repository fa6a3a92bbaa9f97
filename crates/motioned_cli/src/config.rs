//! motioned configuration file handling

use anyhow::{Context, Result};
use indexmap::IndexMap;
use motioned_animation::{Initial, TransitionTree, Variants, DEFAULT_RESOLUTION};
use motioned_core::{PropertyName, StyleValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration (motioned.toml or motioned.json)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MotionedConfig {
    /// Where the element's first frame comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<Initial>,
    #[serde(default)]
    pub motion: MotionConfig,
    /// Element-wide transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionTree>,
    #[serde(default)]
    pub variants: Variants,
    /// Live property values before anything animates
    #[serde(default)]
    pub current: IndexMap<PropertyName, StyleValue>,
}

/// Sampling configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct MotionConfig {
    /// Spring samples per second
    #[serde(default = "default_resolution")]
    pub resolution: u32,
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
        }
    }
}

impl MotionedConfig {
    /// Load configuration from a file, or from motioned.toml in a directory
    ///
    /// Files ending in `.json` are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path: PathBuf = if path.is_dir() {
            path.join("motioned.toml")
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No motioned config found at {}", config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let is_json = config_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))
        } else {
            Self::from_toml(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
