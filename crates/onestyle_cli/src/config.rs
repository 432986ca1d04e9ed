//! onestyle configuration file handling

use anyhow::{Context, Result};
use onestyle_theme::{CompilerOptions, DefaultPreset, StoreConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "onestyle.toml";

/// Top-level onestyle configuration (onestyle.toml)
#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct OnestyleConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub css: CssConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Project metadata
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    "onestyle".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

/// Where and under which keys state is persisted
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// File backend root (relative to the project directory)
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_config_key")]
    pub config_key: String,
    #[serde(default = "default_overrides_key")]
    pub overrides_key: String,
    #[serde(default = "default_collections_key")]
    pub collections_key: String,
}

fn default_dir() -> String {
    ".onestyle".to_string()
}

fn default_namespace() -> String {
    "onestyle".to_string()
}

fn default_config_key() -> String {
    "theme_config".to_string()
}

fn default_overrides_key() -> String {
    "custom_overrides".to_string()
}

fn default_collections_key() -> String {
    "block_collections".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            namespace: default_namespace(),
            config_key: default_config_key(),
            overrides_key: default_overrides_key(),
            collections_key: default_collections_key(),
        }
    }
}

/// Generated stylesheet selectors
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct CssConfig {
    #[serde(default = "default_root_selector")]
    pub root_selector: String,
    #[serde(default = "default_base_element_selector")]
    pub base_element_selector: String,
    /// id of the `<style>` element emitted by `compile --wrap`
    #[serde(default = "default_style_id")]
    pub style_id: String,
}

fn default_root_selector() -> String {
    ":root".to_string()
}

fn default_base_element_selector() -> String {
    ".one-block".to_string()
}

fn default_style_id() -> String {
    "onestyle-theme".to_string()
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            root_selector: default_root_selector(),
            base_element_selector: default_base_element_selector(),
            style_id: default_style_id(),
        }
    }
}

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// Built-in document used on first run and by `reset`
    #[serde(default)]
    pub preset: DefaultPreset,
}

impl OnestyleConfig {
    /// Load configuration from a directory (looks for onestyle.toml).
    ///
    /// A directory without one uses the defaults.
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            debug!("no {} in {}, using defaults", CONFIG_FILE, path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: OnestyleConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Create a new configuration with the given project name
    pub fn new(name: &str) -> Self {
        Self {
            project: ProjectConfig {
                name: name.to_string(),
            },
            ..Self::default()
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Storage directory for a project rooted at `project_dir`.
    pub fn storage_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.storage.dir)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            namespace: self.storage.namespace.clone(),
            config_key: self.storage.config_key.clone(),
            overrides_key: self.storage.overrides_key.clone(),
            preset: self.defaults.preset,
        }
    }

    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            root_selector: self.css.root_selector.clone(),
            base_element_selector: self.css.base_element_selector.clone(),
        }
    }
}
