use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pip::RegionContext;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    pub name: String,
    pub path: PathBuf,
}

impl Config {
    /// Load a TOML config. Relative region paths are resolved against the
    /// directory holding the config file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        if let Some(base) = path.parent() {
            for region in &mut config.regions {
                if region.path.is_relative() {
                    region.path = base.join(&region.path);
                }
            }
        }

        Ok(config)
    }

    /// Load every configured region. Files that fail to load become empty regions.
    pub fn build_context(&self) -> RegionContext {
        self.regions
            .iter()
            .fold(RegionContext::builder(), |builder, region| {
                builder.load_file(&region.name, &region.path)
            })
            .build()
    }
}
