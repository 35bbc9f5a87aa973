use anyhow::{Context, Result};
use esmap::IndexSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "esmap.toml";

/// Project context for esmap operations
pub struct ProjectContext {
    /// Root directory of the project (where Cargo.toml is)
    pub project_root: PathBuf,
    /// Path to config file
    pub config_path: PathBuf,
    /// Loaded configuration, defaults when the file is absent
    pub config: EsmapConfig,
}

/// Configuration stored in esmap.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EsmapConfig {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,
    #[serde(default)]
    pub number_of_replicas: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            number_of_shards: default_shards(),
            number_of_replicas: 0,
        }
    }
}

fn default_shards() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_scan_dirs")]
    pub dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            dirs: default_scan_dirs(),
        }
    }
}

fn default_scan_dirs() -> Vec<String> {
    vec!["src".to_string()]
}

impl ProjectContext {
    /// Find and load project context from current directory or ancestors
    pub fn find() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::find_from(&current_dir)
    }

    /// Find project context starting from the given directory
    pub fn find_from(start: &Path) -> Result<Self> {
        let project_root = Self::find_project_root(start)?;
        Self::from_root(project_root)
    }

    /// Create context from a known project root
    pub fn from_root(project_root: PathBuf) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).context("Failed to read esmap.toml")?;
            toml::from_str(&content).context("Failed to parse esmap.toml")?
        } else {
            EsmapConfig::default()
        };

        Ok(Self {
            project_root,
            config_path,
            config,
        })
    }

    /// Find project root by looking for Cargo.toml
    fn find_project_root(start: &Path) -> Result<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join("Cargo.toml").exists() {
                return Ok(current);
            }

            if !current.pop() {
                anyhow::bail!(
                    "Could not find Cargo.toml in {start:?} or any parent directory. \
                     Are you in a Rust project?"
                );
            }
        }
    }

    /// Directories searched for records, resolved against the project root
    pub fn scan_dirs(&self) -> Vec<PathBuf> {
        self.config.scan.dirs.iter().map(|dir| self.project_root.join(dir)).collect()
    }

    /// Index settings from the config file, with command-line overrides applied
    pub fn index_settings(&self, shards: Option<u32>, replicas: Option<u32>) -> IndexSettings {
        IndexSettings {
            number_of_shards: shards.unwrap_or(self.config.index.number_of_shards),
            number_of_replicas: replicas.unwrap_or(self.config.index.number_of_replicas),
            analysis: None,
        }
    }
}
