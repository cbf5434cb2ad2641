use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    content::ContentType,
    error::ForgeError,
    paths::{get_config_path, get_root_cache_dir, get_root_data_dir},
    provider::Provider,
};

pub const CONFIG_ENV: &str = "CONTENTFORGE_CONFIG";
pub const DATA_DIR_ENV: &str = "CONTENTFORGE_DATA_DIR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptSourceKind {
    #[default]
    Mock,
    YtDlp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Template,
    Provider,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostsBackendKind {
    #[default]
    Mock,
    WordPress,
}

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub provider: Provider,
    pub default_content_type: ContentType,
    pub transcript_source: TranscriptSourceKind,
    pub generator: GeneratorKind,
    pub posts_backend: PostsBackendKind,
    /// Reproduce the delays of the mock backends.
    pub simulate_latency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: get_root_data_dir(),
            cache_dir: get_root_cache_dir(),
            provider: Provider::default(),
            default_content_type: ContentType::default(),
            transcript_source: TranscriptSourceKind::default(),
            generator: GeneratorKind::default(),
            posts_backend: PostsBackendKind::default(),
            simulate_latency: false,
        }
    }
}

impl Config {
    /// Load from `CONTENTFORGE_CONFIG` or the default location, then apply
    /// `CONTENTFORGE_DATA_DIR`. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(get_config_path);

        let mut config = Self::load_from(&path)?;
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw).map_err(|reason| ForgeError::ConfigFailed {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(raw: &str) -> std::result::Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Fixed delay for a mock operation, zero unless latency is simulated.
    pub fn latency(&self, millis: u64) -> Duration {
        if self.simulate_latency {
            Duration::from_millis(millis)
        } else {
            Duration::ZERO
        }
    }
}
